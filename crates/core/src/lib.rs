// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pt-core: data model and timeline reconciliation for the provisioning
//! job tracker

pub mod macros;

pub mod clock;
pub mod id;
pub mod job;
pub mod state;
pub mod status;
pub mod step;
pub mod timeline;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use id::{short, CorrelationId, JobId};
pub use job::{CorrelationMetadata, JobHandle, JobRequest, PersistedJobRef};
#[cfg(any(test, feature = "test-support"))]
pub use state::JobStateBuilder;
pub use state::{Condition, ConditionStatus, JobState, Milestone, MilestoneStatus};
pub use status::{indicates_failure, is_terminal, terminal_outcome, JobOutcome};
pub use step::{default_catalog, validate_catalog, CatalogError, StepDefinition};
pub use timeline::{find_signal, reconcile, Signal, StepStatus, Timeline, TimelineEntry};
