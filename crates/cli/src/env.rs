// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

use std::path::PathBuf;

use crate::config::{ConfigError, Overrides};

const APP_DIR: &str = "provtrack";

/// Explicit config file: `PT_CONFIG`, else `<config_dir>/provtrack/config.toml`.
///
/// The flag is `true` when the path came from `PT_CONFIG` and must exist.
pub fn config_path() -> Option<(PathBuf, bool)> {
    if let Some(path) = var("PT_CONFIG") {
        return Some((PathBuf::from(path), true));
    }
    dirs::config_dir().map(|dir| (dir.join(APP_DIR).join("config.toml"), false))
}

/// Fallback state directory: XDG_STATE_HOME/provtrack > ~/.local/state/provtrack
///
/// `PT_STATE_DIR` is read through [`overrides`] so it layers with the
/// config file and flags.
pub fn default_state_dir() -> Result<PathBuf, ConfigError> {
    if let Some(xdg) = var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join(APP_DIR));
    }
    let home = dirs::home_dir().ok_or(ConfigError::NoStateDir)?;
    Ok(home.join(".local/state").join(APP_DIR))
}

/// Settings supplied through `PT_*` variables.
pub fn overrides() -> Result<Overrides, ConfigError> {
    Ok(Overrides {
        api_url: var("PT_API_URL"),
        api_token: var("PT_API_TOKEN"),
        poll_interval_ms: millis("PT_POLL_INTERVAL_MS")?,
        request_timeout_ms: millis("PT_REQUEST_TIMEOUT_MS")?,
        state_dir: var("PT_STATE_DIR").map(PathBuf::from),
        steps: None,
    })
}

/// Log filter directive (default `info`)
pub fn log_filter() -> String {
    var("PT_LOG").unwrap_or_else(|| "info".to_string())
}

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn millis(name: &'static str) -> Result<Option<u64>, ConfigError> {
    match var(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { var: name, value }),
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
