// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal classification of free-form control-plane status strings.
//!
//! Unrecognized statuses are always non-terminal, so the tracker keeps
//! polling instead of giving up on a job it cannot classify.

use serde::{Deserialize, Serialize};

const SUCCESS: &[&str] = &["succeeded", "success", "completed", "complete"];
const FAILURE: &[&str] = &["failed", "failure", "error", "errored"];
const CANCELLED: &[&str] = &["cancelled", "canceled"];

/// Final outcome of a tracked job, reported once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobOutcome {
    Succeeded,
    /// Job failure or control-plane cancellation
    Failed,
}

crate::simple_display! {
    JobOutcome {
        Succeeded => "succeeded",
        Failed => "failed",
    }
}

fn matches_any(status: &str, set: &[&str]) -> bool {
    let status = status.trim();
    set.iter().any(|s| status.eq_ignore_ascii_case(s))
}

/// True iff `status` is a recognized success, failure, or cancellation value.
pub fn is_terminal(status: &str) -> bool {
    terminal_outcome(status).is_some()
}

/// Outcome for a terminal status, `None` for anything still in flight.
pub fn terminal_outcome(status: &str) -> Option<JobOutcome> {
    if matches_any(status, SUCCESS) {
        Some(JobOutcome::Succeeded)
    } else if matches_any(status, FAILURE) || matches_any(status, CANCELLED) {
        Some(JobOutcome::Failed)
    } else {
        None
    }
}

/// True when the overall status reports a job-level failure or cancellation.
///
/// Matches exactly the statuses that [`terminal_outcome`] maps to
/// [`JobOutcome::Failed`].
pub fn indicates_failure(status: &str) -> bool {
    terminal_outcome(status) == Some(JobOutcome::Failed)
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
