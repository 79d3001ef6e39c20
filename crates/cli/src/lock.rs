// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exclusive hold on the job slot in a state directory.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::exit_error::{ExitError, EXIT_USAGE};

pub const LOCK_FILE_NAME: &str = "tracker.lock";

/// Released when dropped.
#[derive(Debug)]
pub struct TrackerLock {
    file: File,
    path: PathBuf,
}

impl TrackerLock {
    pub fn acquire(state_dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(state_dir)?;
        let path = state_dir.join(LOCK_FILE_NAME);
        // Don't truncate before holding the lock: the PID belongs to the holder
        let file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        if file.try_lock_exclusive().is_err() {
            let holder = std::fs::read_to_string(&path).unwrap_or_default();
            let holder = holder.trim();
            let message = if holder.is_empty() {
                format!("another provtrack process holds {}", path.display())
            } else {
                format!("another provtrack process (pid {holder}) holds {}", path.display())
            };
            return Err(ExitError::new(EXIT_USAGE, message).into());
        }

        let mut file = file;
        file.set_len(0)?;
        writeln!(file, "{}", std::process::id())?;
        tracing::debug!(path = %path.display(), "acquired tracker lock");
        Ok(Self { file, path })
    }
}

impl Drop for TrackerLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        tracing::debug!(path = %self.path.display(), "released tracker lock");
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
