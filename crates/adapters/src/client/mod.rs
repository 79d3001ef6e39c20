// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Control-plane client: job submission and status retrieval

mod http;

pub use http::{HttpClientConfig, HttpClientError, HttpStatusClient};

use async_trait::async_trait;
use pt_core::{JobHandle, JobId, JobRequest, JobState};
use thiserror::Error;

/// Errors from the submission and status endpoints
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// Credentials absent or rejected (HTTP 401)
    #[error("authentication failed: {0}")]
    Authentication(String),
    /// Caller lacks permission (HTTP 403)
    #[error("not authorized: {0}")]
    Authorization(String),
    /// Any other non-2xx response, transport failure, or undecodable body
    #[error("request failed: {message}")]
    Request { status: Option<u16>, message: String },
}

impl ClientError {
    pub fn request(message: impl Into<String>) -> Self {
        ClientError::Request { status: None, message: message.into() }
    }

    /// Worth retrying on the next scheduled poll.
    pub fn is_transient(&self) -> bool {
        matches!(self, ClientError::Request { .. })
    }
}

/// Request/response wrapper over the control-plane API.
///
/// Stateless; callers serialize their own calls.
#[async_trait]
pub trait StatusClient: Send + Sync + 'static {
    /// Submit a provisioning request and return the accepted job's handle.
    async fn submit(&self, request: &JobRequest) -> Result<JobHandle, ClientError>;

    /// Fetch the current snapshot of a job.
    async fn fetch_status(&self, job_id: &JobId) -> Result<JobState, ClientError>;
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake;

#[cfg(any(test, feature = "test-support"))]
pub use fake::{ClientCall, FakeStatusClient};

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
