// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-backed job store.
//!
//! The reference lives in a single JSON file wrapped in a versioned
//! envelope. Writes go to a temp file that is synced and renamed over the
//! target, so readers only ever see the old or the new reference.

use crate::store::{JobStore, StoreError};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use pt_core::PersistedJobRef;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Current job file schema version
pub const CURRENT_STORE_VERSION: u32 = 1;

/// File name of the job reference inside the state directory
pub const JOB_FILE_NAME: &str = "job.json";

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    /// Schema version for migrations
    #[serde(rename = "v")]
    version: u32,
    saved_at: DateTime<Utc>,
    job: PersistedJobRef,
}

/// Peek at the version before committing to the full schema.
#[derive(Deserialize)]
struct VersionHeader {
    #[serde(rename = "v")]
    version: u32,
}

pub struct FileJobStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileJobStore {
    /// Store at `<state_dir>/job.json`.
    pub fn in_dir(state_dir: &Path) -> Self {
        Self::new(state_dir.join(JOB_FILE_NAME))
    }

    pub fn new(path: PathBuf) -> Self {
        Self { path, write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    fn corrupt(&self, source: serde_json::Error) -> StoreError {
        StoreError::Corrupt { path: self.path.clone(), source }
    }
}

impl JobStore for FileJobStore {
    fn save(&self, job_ref: &PersistedJobRef) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let envelope =
            Envelope { version: CURRENT_STORE_VERSION, saved_at: Utc::now(), job: job_ref.clone() };
        let json = serde_json::to_vec_pretty(&envelope)?;

        let tmp_path = self.tmp_path();
        let mut file = std::fs::File::create(&tmp_path)?;
        file.write_all(&json)?;
        file.sync_all()?;
        drop(file);
        std::fs::rename(&tmp_path, &self.path)?;

        tracing::debug!(job_id = %job_ref.job_id, path = %self.path.display(), "saved job ref");
        Ok(())
    }

    fn load(&self) -> Result<Option<PersistedJobRef>, StoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let header: VersionHeader = serde_json::from_slice(&bytes).map_err(|e| self.corrupt(e))?;
        if header.version != CURRENT_STORE_VERSION {
            return Err(StoreError::UnsupportedVersion(header.version));
        }
        let envelope: Envelope = serde_json::from_slice(&bytes).map_err(|e| self.corrupt(e))?;

        tracing::debug!(
            job_id = %envelope.job.job_id,
            saved_at = %envelope.saved_at,
            "loaded job ref"
        );
        Ok(Some(envelope.job))
    }

    fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "cleared job ref");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
