//! ritual - habit tracker CLI
//!
//! Non-interactive front end over the habit engine: marks tasks
//! completed or not for today, and prints completion and streak
//! rollups. State lives in a JSON snapshot file.

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use ritual::habit::{find_task, find_task_mut, Task, TaskList};
use ritual::{system_clock, AppConfig, RitualError, TaskStore};

#[derive(Parser)]
#[command(name = "ritual")]
#[command(version = "0.1.0")]
#[command(about = "Track daily habits, completions and streaks", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Task snapshot file (defaults to the configured data file)
    #[arg(long, global = true, value_name = "FILE")]
    data_file: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new habit
    Add {
        /// Habit name
        name: String,

        /// What this habit is about
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Mark a habit completed for today
    Done {
        /// Habit name
        name: String,
    },

    /// Undo today's completion
    Undo {
        /// Habit name
        name: String,
    },

    /// Remove a habit and its whole history
    Remove {
        /// Habit name
        name: String,
    },

    /// List habits with today's status
    List,

    /// Show completion and streak rollups
    Stats {
        /// Habit name (all habits when omitted)
        name: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("ritual=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {e:#}", "error:".red().bold());
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let data_file = match cli.data_file {
        Some(path) => path,
        None => AppConfig::load().context("loading configuration")?.data_file,
    };

    let store = TaskStore::new(&data_file);
    let clock = system_clock();
    let mut tasks = store
        .load_or_default(clock.clone())
        .with_context(|| format!("loading tasks from {}", data_file.display()))?;

    match cli.command {
        Commands::Add { name, description } => {
            if find_task(&tasks, &name).is_some() {
                return Err(RitualError::DuplicateTask { name }.into());
            }
            tasks.push(Task::with_clock(&name, &description, clock));
            store.save(&tasks)?;
            println!("{} {name}", "added".green());
        }

        Commands::Done { name } => {
            let task = require_task(&mut tasks, &name)?;
            task.mark_completed();
            let streak = task.current_streak();
            store.save(&tasks)?;
            println!("{} {name} (streak: {streak})", "done".green());
        }

        Commands::Undo { name } => {
            let task = require_task(&mut tasks, &name)?;
            task.mark_uncompleted();
            store.save(&tasks)?;
            println!("{} {name}", "undone".yellow());
        }

        Commands::Remove { name } => {
            if find_task(&tasks, &name).is_none() {
                return Err(RitualError::unknown_task(name).into());
            }
            tasks.retain(|task| task.name != name);
            store.save(&tasks)?;
            println!("{} {name}", "removed".yellow());
        }

        Commands::List => {
            if tasks.is_empty() {
                println!("no habits yet - add one with `ritual add <name>`");
            }
            for task in &tasks {
                let marker = if task.was_completed_today() {
                    "x".green()
                } else {
                    " ".normal()
                };
                println!("[{marker}] {} - {}", task.name, task.description);
            }
        }

        Commands::Stats { name } => {
            let selected: Vec<&Task> = match &name {
                Some(name) => vec![find_task(&tasks, name)
                    .ok_or_else(|| RitualError::unknown_task(name.clone()))?],
                None => tasks.iter().collect(),
            };

            for task in selected {
                print_stats(task);
            }
        }
    }

    Ok(())
}

fn require_task<'a>(tasks: &'a mut TaskList, name: &str) -> anyhow::Result<&'a mut Task> {
    find_task_mut(tasks, name).ok_or_else(|| RitualError::unknown_task(name).into())
}

fn print_stats(task: &Task) {
    let completion = task.completion_summary();
    let streaks = task.streak_summary();

    println!("{}", task.name.bold());
    println!(
        "  completions  week {}  month {}  year {}",
        completion.week, completion.month, completion.year
    );
    println!(
        "  streaks      current {}  month best {}  year best {}",
        streaks.current, streaks.month_best, streaks.year_best
    );
}
