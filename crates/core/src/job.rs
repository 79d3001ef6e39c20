// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Submission-side types: request, handle, and the persisted job reference.

use crate::id::{CorrelationId, JobId};
use serde::{Deserialize, Serialize};

/// Caller-supplied payload describing the desired end state.
///
/// Opaque to the tracker; forwarded to the submission endpoint as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobRequest(serde_json::Value);

impl JobRequest {
    pub fn new(payload: serde_json::Value) -> Self {
        Self(payload)
    }

    pub fn payload(&self) -> &serde_json::Value {
        &self.0
    }

    /// Short human label for logs: the payload's `name` field, if any.
    pub fn label(&self) -> Option<&str> {
        self.0.get("name").and_then(|v| v.as_str())
    }
}

/// Returned by the submission endpoint once a job is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobHandle {
    #[serde(alias = "jobId")]
    pub id: JobId,
    #[serde(alias = "status", default)]
    pub initial_status: String,
}

/// Metadata stored alongside the job id so a resumed tracker can report
/// what it is tracking and since when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMetadata {
    pub correlation_id: CorrelationId,
    pub submitted_at_ms: u64,
    pub initial_status: String,
    /// The originating request, kept for display on resume
    pub request: JobRequest,
}

/// The only tracker state written to durable storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedJobRef {
    pub job_id: JobId,
    pub correlation: CorrelationMetadata,
}

impl PersistedJobRef {
    pub fn new(handle: &JobHandle, request: JobRequest, submitted_at_ms: u64) -> Self {
        Self {
            job_id: handle.id.clone(),
            correlation: CorrelationMetadata {
                correlation_id: CorrelationId::generate(),
                submitted_at_ms,
                initial_status: handle.initial_status.clone(),
                request,
            },
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
