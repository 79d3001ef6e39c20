// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{Condition, ConditionStatus, JobState, Milestone, MilestoneStatus};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for control-plane snapshots.
pub mod strategies {
    use crate::state::{Condition, ConditionStatus, JobState, Milestone, MilestoneStatus};
    use proptest::prelude::*;

    /// Step ids and labels from the default catalog mixed with noise, so
    /// generated signals hit every matching rule.
    fn arb_signal_key() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("SPEC_SUBMITTED".to_string()),
            Just("INFRA_APPLY".to_string()),
            Just("Refreshing state".to_string()),
            Just("Secrets synced".to_string()),
            "[A-Za-z_ ]{0,12}",
        ]
    }

    pub fn arb_milestone_status() -> impl Strategy<Value = MilestoneStatus> {
        prop_oneof![
            Just(MilestoneStatus::Pending),
            Just(MilestoneStatus::InProgress),
            Just(MilestoneStatus::Complete),
            Just(MilestoneStatus::Error),
            Just(MilestoneStatus::Unknown),
        ]
    }

    pub fn arb_condition_status() -> impl Strategy<Value = ConditionStatus> {
        prop_oneof![
            Just(ConditionStatus::True),
            Just(ConditionStatus::False),
            Just(ConditionStatus::Unknown),
        ]
    }

    pub fn arb_milestone() -> impl Strategy<Value = Milestone> {
        (arb_signal_key(), arb_signal_key(), arb_milestone_status(), any::<Option<String>>())
            .prop_map(|(id, label, status, details)| Milestone {
                id,
                label,
                status,
                timestamp: None,
                details,
            })
    }

    pub fn arb_condition() -> impl Strategy<Value = Condition> {
        (arb_signal_key(), arb_condition_status(), any::<Option<String>>(), any::<Option<String>>())
            .prop_map(|(kind, status, message, reason)| Condition {
                kind,
                status,
                last_transition_time: None,
                message,
                reason,
            })
    }

    pub fn arb_status() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("SUBMITTED".to_string()),
            Just("RUNNING".to_string()),
            Just("SUCCEEDED".to_string()),
            Just("failed".to_string()),
            Just("CANCELLED".to_string()),
            "[a-zA-Z-]{0,16}",
        ]
    }

    pub fn arb_job_state() -> impl Strategy<Value = JobState> {
        (
            arb_status(),
            proptest::collection::vec(arb_milestone(), 0..6),
            proptest::collection::vec(arb_condition(), 0..6),
            proptest::option::of(0.0f64..100.0),
        )
            .prop_map(|(status, milestones, conditions, progress)| JobState {
                id: "job-prop".into(),
                status,
                phase: None,
                progress,
                error: None,
                milestones,
                conditions,
            })
    }
}

// ── Snapshot factory functions ──────────────────────────────────────────

/// Snapshot with the given status and every listed milestone in `status`.
pub fn state_with_milestones(
    job_id: &str,
    status: &str,
    milestones: &[(&str, MilestoneStatus)],
) -> JobState {
    JobState::builder()
        .id(job_id)
        .status(status)
        .milestones(milestones.iter().map(|(id, s)| Milestone::new(*id, *s)).collect())
        .build()
}

/// Snapshot carrying only Kubernetes-style conditions.
pub fn state_with_conditions(
    job_id: &str,
    status: &str,
    conditions: &[(&str, ConditionStatus)],
) -> JobState {
    JobState::builder()
        .id(job_id)
        .status(status)
        .conditions(conditions.iter().map(|(kind, s)| Condition::new(*kind, *s)).collect())
        .build()
}
