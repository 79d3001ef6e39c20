// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot desktop alerts for finished jobs

use async_trait::async_trait;
use pt_core::{JobOutcome, JobState};
use thiserror::Error;

/// Errors from notify operations
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Alert content for a finished job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn for_outcome(outcome: JobOutcome, state: &JobState) -> Self {
        let title = match outcome {
            JobOutcome::Succeeded => format!("Job {} succeeded", state.id),
            JobOutcome::Failed => format!("Job {} failed", state.id),
        };
        let body = match (&state.error, &state.phase) {
            (Some(error), _) if !error.is_empty() => error.clone(),
            (_, Some(phase)) if !phase.is_empty() => format!("{} ({})", state.status, phase),
            _ => state.status.clone(),
        };
        Self { title, body }
    }
}

/// Adapter for sending notifications
#[async_trait]
pub trait NotifyAdapter: Clone + Send + Sync + 'static {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Desktop notification adapter using notify-rust.
///
/// On macOS, the first notification makes `mac-notification-sys` look up a
/// bundle identifier through AppleScript, which blocks forever without
/// Automation permissions. The identifier is pre-set at construction.
#[derive(Clone, Copy, Debug, Default)]
pub struct DesktopNotifyAdapter;

impl DesktopNotifyAdapter {
    pub fn new() -> Self {
        #[cfg(target_os = "macos")]
        {
            let _ = mac_notification_sys::set_application("com.apple.Terminal");
        }
        Self
    }
}

#[async_trait]
impl NotifyAdapter for DesktopNotifyAdapter {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let Notification { title, body } = notification.clone();
        // show() is synchronous on some platforms
        tokio::task::spawn_blocking(move || {
            notify_rust::Notification::new()
                .summary(&title)
                .body(&body)
                .show()
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| NotifyError::SendFailed(e.to_string()))?
        .map_err(NotifyError::SendFailed)?;
        tracing::info!(title = %notification.title, "desktop notification sent");
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{Notification, NotifyAdapter, NotifyError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Fake notification adapter for testing
    #[derive(Clone, Default)]
    pub struct FakeNotifyAdapter {
        sent: Arc<Mutex<Vec<Notification>>>,
    }

    impl FakeNotifyAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Get all recorded notifications
        pub fn sent(&self) -> Vec<Notification> {
            self.sent.lock().clone()
        }
    }

    #[async_trait]
    impl NotifyAdapter for FakeNotifyAdapter {
        async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
            self.sent.lock().push(notification.clone());
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeNotifyAdapter;

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
