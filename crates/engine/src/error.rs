// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use pt_adapters::ClientError;
use pt_core::{CatalogError, JobId};
use pt_storage::StoreError;
use thiserror::Error;

/// Errors surfaced by [`crate::JobTracker`]
#[derive(Debug, Error)]
pub enum TrackError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The job was accepted but its reference could not be written.
    #[error("job {job_id} was accepted but could not be persisted: {source}")]
    Persist { job_id: JobId, source: StoreError },
    #[error("already tracking job {0}")]
    AlreadyTracking(JobId),
    #[error("a submission is already in progress")]
    Submitting,
    #[error("no job to track")]
    NothingToTrack,
    #[error("tracker was stopped")]
    Stopped,
    #[error("tracker is already running")]
    AlreadyRunning,
    #[error("invalid step catalog: {0}")]
    Catalog(#[from] CatalogError),
}

impl TrackError {
    /// True when the control plane rejected our credentials.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            TrackError::Client(ClientError::Authentication(_) | ClientError::Authorization(_))
        )
    }
}
