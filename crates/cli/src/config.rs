// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Layered settings.
//!
//! Each layer is an [`Overrides`]; later layers win field by field:
//! built-in defaults < config file < `PT_*` environment < command-line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use pt_core::{default_catalog, validate_catalog, CatalogError, StepDefinition};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid config {}: {source}", path.display())]
    Parse { path: PathBuf, source: toml::de::Error },
    #[error("invalid value {value:?} for {var}: expected milliseconds")]
    InvalidEnv { var: &'static str, value: String },
    #[error("cannot determine state directory: set PT_STATE_DIR")]
    NoStateDir,
    #[error("invalid step catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// One settings layer. Absent fields defer to lower layers.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
    pub state_dir: Option<PathBuf>,
    pub steps: Option<Vec<StepDefinition>>,
}

impl Overrides {
    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        toml::from_str(&text)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Like [`Overrides::from_file`], but a missing file is an empty layer.
    pub fn from_optional_file(path: &Path) -> Result<Self, ConfigError> {
        match Self::from_file(path) {
            Err(ConfigError::Read { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Layer `higher` on top of `self`.
    pub fn merge(self, higher: Overrides) -> Overrides {
        Overrides {
            api_url: higher.api_url.or(self.api_url),
            api_token: higher.api_token.or(self.api_token),
            poll_interval_ms: higher.poll_interval_ms.or(self.poll_interval_ms),
            request_timeout_ms: higher.request_timeout_ms.or(self.request_timeout_ms),
            state_dir: higher.state_dir.or(self.state_dir),
            steps: higher.steps.or(self.steps),
        }
    }
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub state_dir: PathBuf,
    pub steps: Vec<StepDefinition>,
}

impl Settings {
    /// Resolve `layers` (lowest first) over the built-in defaults.
    pub fn resolve(
        layers: impl IntoIterator<Item = Overrides>,
        default_state_dir: impl FnOnce() -> Result<PathBuf, ConfigError>,
    ) -> Result<Self, ConfigError> {
        let merged = layers.into_iter().fold(Overrides::default(), Overrides::merge);

        let steps = merged.steps.unwrap_or_else(default_catalog);
        validate_catalog(&steps)?;
        let state_dir = match merged.state_dir {
            Some(dir) => dir,
            None => default_state_dir()?,
        };

        Ok(Self {
            api_url: merged.api_url,
            api_token: merged.api_token,
            poll_interval: Duration::from_millis(
                merged.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS),
            ),
            request_timeout: Duration::from_millis(
                merged.request_timeout_ms.unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS),
            ),
            state_dir,
            steps,
        })
    }

    /// Load from the config file and environment, then apply `flags`.
    pub fn load(flags: Overrides) -> Result<Self, ConfigError> {
        let file = match crate::env::config_path() {
            Some((path, true)) => Overrides::from_file(&path)?,
            Some((path, false)) => Overrides::from_optional_file(&path)?,
            None => Overrides::default(),
        };
        let env = crate::env::overrides()?;
        Self::resolve([file, env, flags], crate::env::default_state_dir)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
