// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod forget;
pub mod show;
pub mod status;
pub mod submit;
mod track;
pub mod watch;

use anyhow::Result;
use pt_adapters::{ClientError, HttpClientConfig, HttpClientError, HttpStatusClient};
use pt_engine::{JobTracker, TrackError, TrackerConfig};
use pt_storage::FileJobStore;

use crate::config::Settings;
use crate::exit_error::{ExitError, EXIT_AUTH, EXIT_USAGE};
use crate::output::OutputFormat;

pub type Tracker = JobTracker<HttpStatusClient, FileJobStore>;

/// Everything a command needs from the command line and settings.
pub struct Context {
    pub settings: Settings,
    pub format: OutputFormat,
    pub notify: bool,
}

impl Context {
    pub fn store(&self) -> FileJobStore {
        FileJobStore::in_dir(&self.settings.state_dir)
    }

    pub fn client(&self) -> Result<HttpStatusClient> {
        let Some(url) = self.settings.api_url.as_deref() else {
            return Err(ExitError::new(
                EXIT_USAGE,
                "no API URL configured: set PT_API_URL, api_url in the config file, or --api-url",
            )
            .into());
        };
        let mut config = HttpClientConfig::new(url).timeout(self.settings.request_timeout);
        if let Some(token) = &self.settings.api_token {
            config = config.token(token.clone());
        }
        HttpStatusClient::new(config).map_err(|e| match e {
            HttpClientError::InvalidUrl { .. } => ExitError::new(EXIT_USAGE, e.to_string()).into(),
            other => other.into(),
        })
    }

    pub fn open_tracker(&self) -> Result<Tracker> {
        let config = TrackerConfig::default()
            .poll_interval(self.settings.poll_interval)
            .steps(self.settings.steps.clone());
        JobTracker::open(self.client()?, self.store(), config).map_err(track_error)
    }
}

/// Map tracker errors onto process exit codes.
pub(crate) fn track_error(e: TrackError) -> anyhow::Error {
    match e {
        e if e.is_auth() => ExitError::new(EXIT_AUTH, e.to_string()).into(),
        TrackError::NothingToTrack => ExitError::nothing_to_track().into(),
        TrackError::AlreadyTracking(id) => ExitError::new(
            EXIT_USAGE,
            format!("already tracking job {id}: run `provtrack watch` or `provtrack forget`"),
        )
        .into(),
        other => other.into(),
    }
}

pub(crate) fn client_error(e: ClientError) -> anyhow::Error {
    match e {
        ClientError::Authentication(_) | ClientError::Authorization(_) => {
            ExitError::new(EXIT_AUTH, e.to_string()).into()
        }
        other => other.into(),
    }
}
