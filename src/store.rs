//! Flat-file task store.
//!
//! The store is the storage collaborator around the snapshot codec: it
//! moves bytes between disk and [`encode_tasks`]/[`decode_tasks`] and
//! nothing else. Saves are atomic (temp file + rename) under an
//! exclusive advisory lock. Loads never destroy data: a corrupt file
//! is reported as an error and left in place, since the task file is
//! primary data rather than a rebuildable cache.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::clock::SharedClock;
use crate::error::{Result, RitualError};
use crate::habit::{decode_tasks, encode_tasks, TaskList};

/// Temporary file suffix for atomic writes.
const TMP_SUFFIX: &str = ".tmp";

/// Lock file suffix for concurrent access prevention.
const LOCK_SUFFIX: &str = ".lock";

/// Task snapshot file on disk.
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    /// Create a store around the given snapshot file path.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(TMP_SUFFIX);
        PathBuf::from(name)
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(LOCK_SUFFIX);
        PathBuf::from(name)
    }

    /// Save the task list atomically.
    pub fn save(&self, tasks: &TaskList) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let lock_file = File::create(self.lock_path())?;
        FileExt::lock_exclusive(&lock_file)
            .map_err(|e| RitualError::store(format!("failed to acquire lock: {e}"), &self.path))?;

        let bytes = encode_tasks(tasks)?;

        let tmp_path = self.tmp_path();
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(&bytes)?;
        tmp_file.sync_all()?;

        fs::rename(&tmp_path, &self.path)?;
        debug!(path = %self.path.display(), tasks = tasks.len(), "saved");

        Ok(())
    }

    /// Load the task list, reinjecting `clock` into every task.
    ///
    /// Returns `Ok(None)` when the file does not exist yet. Decode
    /// failures propagate; the file is left untouched.
    pub fn load(&self, clock: SharedClock) -> Result<Option<TaskList>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let tasks = decode_tasks(&bytes, clock)?;
        debug!(path = %self.path.display(), tasks = tasks.len(), "loaded");

        Ok(Some(tasks))
    }

    /// Load the task list, or an empty one when the file is missing.
    pub fn load_or_default(&self, clock: SharedClock) -> Result<TaskList> {
        Ok(self.load(clock)?.unwrap_or_default())
    }

    /// Whether the snapshot file exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}
