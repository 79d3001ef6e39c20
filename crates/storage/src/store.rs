// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use pt_core::PersistedJobRef;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur in job store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt job file {}: {source}", path.display())]
    Corrupt { path: PathBuf, source: serde_json::Error },
    #[error("unsupported job file version {0}")]
    UnsupportedVersion(u32),
}

/// Persistence slot for at most one [`PersistedJobRef`].
///
/// Operations are synchronous and idempotent. `clear` on an empty store is
/// a no-op.
pub trait JobStore: Send + Sync {
    /// Store `job_ref`, replacing any existing reference.
    fn save(&self, job_ref: &PersistedJobRef) -> Result<(), StoreError>;

    fn load(&self) -> Result<Option<PersistedJobRef>, StoreError>;

    fn clear(&self) -> Result<(), StoreError>;
}

impl<T: JobStore + ?Sized> JobStore for Arc<T> {
    fn save(&self, job_ref: &PersistedJobRef) -> Result<(), StoreError> {
        (**self).save(job_ref)
    }

    fn load(&self) -> Result<Option<PersistedJobRef>, StoreError> {
        (**self).load()
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}
