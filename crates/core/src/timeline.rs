// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timeline reconciliation.
//!
//! Maps the fixed step catalog onto the live signals of a [`JobState`].
//! Per step, signals are looked up in a fixed priority order:
//!
//! 1. milestone whose `id` equals the step id
//! 2. milestone whose `label` equals the step label
//! 3. condition whose `type` equals the step id
//! 4. condition whose `type` equals the step label
//!
//! Milestones are orchestrator-reported and outrank generic conditions.
//! [`reconcile`] is pure: identical inputs always yield an identical timeline.

use crate::state::{Condition, ConditionStatus, JobState, Milestone, MilestoneStatus};
use crate::status;
use crate::step::StepDefinition;
use serde::{Deserialize, Serialize};

/// Display status of one timeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Active,
    Complete,
    Error,
}

crate::simple_display! {
    StepStatus {
        Pending => "pending",
        Active => "active",
        Complete => "complete",
        Error => "error",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub step_id: String,
    pub label: String,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl TimelineEntry {
    fn pending(step: &StepDefinition) -> Self {
        Self {
            step_id: step.id.clone(),
            label: step.label.clone(),
            status: StepStatus::Pending,
            timestamp: None,
            message: step.default_message.clone(),
            reason: None,
        }
    }

    fn from_signal(step: &StepDefinition, signal: Signal<'_>) -> Self {
        Self {
            step_id: step.id.clone(),
            label: step.label.clone(),
            status: signal.status(),
            timestamp: signal.timestamp().map(str::to_string),
            message: signal.message().unwrap_or(&step.default_message).to_string(),
            reason: signal.reason().map(str::to_string),
        }
    }
}

/// Ordered reconciliation of the step catalog against one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Timeline {
    pub entries: Vec<TimelineEntry>,
    /// Focus point for display; always `0` for an empty timeline
    pub active_index: usize,
}

impl Timeline {
    /// The entry at `active_index`, if the timeline is non-empty.
    pub fn focused(&self) -> Option<&TimelineEntry> {
        self.entries.get(self.active_index)
    }

    pub fn count(&self, status: StepStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// A live progress signal matched to a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal<'a> {
    Milestone(&'a Milestone),
    Condition(&'a Condition),
}

impl<'a> Signal<'a> {
    pub fn status(&self) -> StepStatus {
        match self {
            Signal::Milestone(m) => match m.status {
                MilestoneStatus::Complete => StepStatus::Complete,
                MilestoneStatus::InProgress => StepStatus::Active,
                MilestoneStatus::Error => StepStatus::Error,
                MilestoneStatus::Pending | MilestoneStatus::Unknown => StepStatus::Pending,
            },
            Signal::Condition(c) => match c.status {
                ConditionStatus::True => StepStatus::Complete,
                ConditionStatus::False => StepStatus::Error,
                ConditionStatus::Unknown => StepStatus::Active,
            },
        }
    }

    pub fn message(&self) -> Option<&'a str> {
        match self {
            Signal::Milestone(m) => non_empty(m.details.as_deref()),
            Signal::Condition(c) => {
                non_empty(c.message.as_deref()).or_else(|| non_empty(c.reason.as_deref()))
            }
        }
    }

    pub fn timestamp(&self) -> Option<&'a str> {
        match self {
            Signal::Milestone(m) => non_empty(m.timestamp.as_deref()),
            Signal::Condition(c) => non_empty(c.last_transition_time.as_deref()),
        }
    }

    pub fn reason(&self) -> Option<&'a str> {
        match self {
            Signal::Milestone(_) => None,
            Signal::Condition(c) => non_empty(c.reason.as_deref()),
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

/// Find the highest-priority signal for `step` in `state`.
pub fn find_signal<'a>(step: &StepDefinition, state: &'a JobState) -> Option<Signal<'a>> {
    let by_label = |label: &str| !step.label.is_empty() && label == step.label;

    let milestone = state
        .milestones
        .iter()
        .find(|m| m.id == step.id)
        .or_else(|| state.milestones.iter().find(|m| by_label(&m.label)));
    if let Some(m) = milestone {
        return Some(Signal::Milestone(m));
    }

    state
        .conditions
        .iter()
        .find(|c| c.kind == step.id)
        .or_else(|| state.conditions.iter().find(|c| by_label(&c.kind)))
        .map(Signal::Condition)
}

/// Reconcile the step catalog against the latest snapshot.
///
/// With no snapshot every step is pending with its default message. When the
/// overall status reports failure, steps that would show as active are
/// demoted to error.
pub fn reconcile(steps: &[StepDefinition], state: Option<&JobState>) -> Timeline {
    let failed = state.is_some_and(|s| status::indicates_failure(&s.status));

    let entries: Vec<TimelineEntry> = steps
        .iter()
        .map(|step| {
            let mut entry = match state.and_then(|s| find_signal(step, s)) {
                Some(signal) => TimelineEntry::from_signal(step, signal),
                None => TimelineEntry::pending(step),
            };
            if failed && entry.status == StepStatus::Active {
                entry.status = StepStatus::Error;
            }
            entry
        })
        .collect();

    let active_index = active_index(&entries);
    Timeline { entries, active_index }
}

/// First active step; else one past the last complete step (clamped to the
/// last entry); else `0`.
fn active_index(entries: &[TimelineEntry]) -> usize {
    if let Some(i) = entries.iter().position(|e| e.status == StepStatus::Active) {
        return i;
    }
    match entries.iter().rposition(|e| e.status == StepStatus::Complete) {
        Some(i) => (i + 1).min(entries.len() - 1),
        None => 0,
    }
}

#[cfg(test)]
#[path = "timeline_tests.rs"]
mod tests;
