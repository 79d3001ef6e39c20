// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Control-plane job snapshot and its two progress signal families.
//!
//! Milestones are explicit orchestrator-reported markers; conditions are
//! Kubernetes-style status assertions. Both may be present, absent, or
//! partially populated in any snapshot.

use crate::id::JobId;
use crate::status;
use serde::{Deserialize, Deserializer, Serialize};

/// Authoritative snapshot returned by the status endpoint.
///
/// Every poll yields a complete snapshot that supersedes the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobState {
    /// Empty when the status body omits it; the poller fills in the job it asked for.
    #[serde(default)]
    pub id: JobId,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub milestones: Vec<Milestone>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub conditions: Vec<Condition>,
}

impl JobState {
    /// Progress percentage clamped to 0..=100; `None` when absent or NaN.
    pub fn progress_pct(&self) -> Option<f64> {
        self.progress.filter(|p| !p.is_nan()).map(|p| p.clamp(0.0, 100.0))
    }

    pub fn is_terminal(&self) -> bool {
        status::is_terminal(&self.status)
    }
}

crate::builder! {
    pub struct JobStateBuilder => JobState {
        into {
            id: JobId = "job-1",
            status: String = "RUNNING",
        }
        set {
            milestones: Vec<Milestone> = Vec::new(),
            conditions: Vec<Condition> = Vec::new(),
        }
        option {
            phase: String = None,
            progress: f64 = None,
            error: String = None,
        }
    }
}

/// Discrete status of an orchestrator milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MilestoneStatus {
    Pending,
    InProgress,
    Complete,
    Error,
    /// Any value the orchestrator sends that is not one of the above
    #[serde(other)]
    Unknown,
}

crate::simple_display! {
    MilestoneStatus {
        Pending => "PENDING",
        InProgress => "IN_PROGRESS",
        Complete => "COMPLETE",
        Error => "ERROR",
        Unknown => "UNKNOWN",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub status: MilestoneStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Milestone {
    pub fn new(id: impl Into<String>, status: MilestoneStatus) -> Self {
        Self { id: id.into(), label: String::new(), status, timestamp: None, details: None }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Tri-state truth value of a Kubernetes-style condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionStatus {
    True,
    False,
    #[serde(other)]
    Unknown,
}

crate::simple_display! {
    ConditionStatus {
        True => "True",
        False => "False",
        Unknown => "Unknown",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub kind: String,
    pub status: ConditionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Condition {
    pub fn new(kind: impl Into<String>, status: ConditionStatus) -> Self {
        Self {
            kind: kind.into(),
            status,
            last_transition_time: None,
            message: None,
            reason: None,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn last_transition_time(mut self, time: impl Into<String>) -> Self {
        self.last_transition_time = Some(time.into());
        self
    }
}

/// Control planes send `null` for empty signal lists as often as they omit them.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
