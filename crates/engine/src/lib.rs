// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Tracking engine: poll scheduling, reconciliation and subscriber fan-out

mod config;
mod error;
pub mod scheduler;
pub mod subscriber;
mod tracker;

pub use config::TrackerConfig;
pub use error::TrackError;
pub use scheduler::{PollExit, PollReport, PollScheduler, MIN_POLL_INTERVAL};
#[cfg(any(test, feature = "test-support"))]
pub use subscriber::RecordingSubscriber;
pub use subscriber::{ChannelSubscriber, DesktopNotifySubscriber, Subscriber, TrackerEvent};
pub use tracker::{JobTracker, TrackOutcome, TrackerPhase, TrackerView};
