// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use pt_core::{default_catalog, StepDefinition};
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Tracker tuning and the step catalog to reconcile against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub poll_interval: Duration,
    pub steps: Vec<StepDefinition>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self { poll_interval: DEFAULT_POLL_INTERVAL, steps: default_catalog() }
    }
}

impl TrackerConfig {
    pt_core::setters! {
        set {
            poll_interval: Duration,
            steps: Vec<StepDefinition>,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
