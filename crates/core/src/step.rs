// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed, ordered catalog of provisioning stages.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// One named provisioning stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub id: String,
    pub label: String,
    /// Shown until a live signal for this step arrives
    #[serde(default, alias = "message")]
    pub default_message: String,
}

impl StepDefinition {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        default_message: impl Into<String>,
    ) -> Self {
        Self { id: id.into(), label: label.into(), default_message: default_message.into() }
    }
}

/// Errors from validating a step catalog
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("step catalog is empty")]
    Empty,
    #[error("step at position {0} has an empty id")]
    EmptyId(usize),
    #[error("duplicate step id '{0}'")]
    DuplicateId(String),
}

/// Built-in stages: submission accepted, refresh, apply, secrets synced,
/// registration complete.
pub fn default_catalog() -> Vec<StepDefinition> {
    vec![
        StepDefinition::new(
            "SPEC_SUBMITTED",
            "Submission accepted",
            "Waiting for the control plane to accept the request",
        ),
        StepDefinition::new(
            "INFRA_REFRESH",
            "Refreshing state",
            "Waiting to refresh current infrastructure state",
        ),
        StepDefinition::new(
            "INFRA_APPLY",
            "Applying changes",
            "Waiting to apply infrastructure changes",
        ),
        StepDefinition::new("SECRETS_SYNCED", "Secrets synced", "Waiting for credentials to sync"),
        StepDefinition::new(
            "REGISTRATION_COMPLETE",
            "Registration complete",
            "Waiting for the workload to register",
        ),
    ]
}

/// Check a catalog is non-empty with unique, non-empty step ids.
pub fn validate_catalog(steps: &[StepDefinition]) -> Result<(), CatalogError> {
    if steps.is_empty() {
        return Err(CatalogError::Empty);
    }
    let mut seen = HashSet::new();
    for (i, step) in steps.iter().enumerate() {
        if step.id.trim().is_empty() {
            return Err(CatalogError::EmptyId(i));
        }
        if !seen.insert(step.id.as_str()) {
            return Err(CatalogError::DuplicateId(step.id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
