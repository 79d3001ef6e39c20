// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Observers of tracker progress.
//!
//! Subscribers are called synchronously from the polling task, in
//! registration order. They must not block; anything slow is handed off
//! to a channel or a spawned task.

use parking_lot::Mutex;
use pt_adapters::{DesktopNotifyAdapter, Notification, NotifyAdapter};
use pt_core::{JobOutcome, JobState, Timeline};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub trait Subscriber: Send + Sync {
    /// A fresh snapshot was reconciled.
    fn on_update(&self, state: &JobState, timeline: &Timeline);

    /// The job finished. Called at most once per job per tracker.
    fn on_terminal(&self, outcome: JobOutcome, state: &JobState);

    /// A poll failed and will be retried on the next tick.
    fn on_transient_error(&self, message: &str);
}

/// Owned copy of one subscriber callback.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TrackerEvent {
    Update { state: JobState, timeline: Timeline },
    Terminal { outcome: JobOutcome, state: JobState },
    TransientError { message: String },
}

/// Forwards every callback to an unbounded channel.
pub struct ChannelSubscriber {
    tx: mpsc::UnboundedSender<TrackerEvent>,
}

impl ChannelSubscriber {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TrackerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: TrackerEvent) {
        // Receiver gone means nobody is listening any more
        let _ = self.tx.send(event);
    }
}

impl Subscriber for ChannelSubscriber {
    fn on_update(&self, state: &JobState, timeline: &Timeline) {
        self.send(TrackerEvent::Update { state: state.clone(), timeline: timeline.clone() });
    }

    fn on_terminal(&self, outcome: JobOutcome, state: &JobState) {
        self.send(TrackerEvent::Terminal { outcome, state: state.clone() });
    }

    fn on_transient_error(&self, message: &str) {
        self.send(TrackerEvent::TransientError { message: message.to_string() });
    }
}

/// Raises one desktop alert when the job finishes.
pub struct DesktopNotifySubscriber<N: NotifyAdapter = DesktopNotifyAdapter> {
    adapter: N,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl<N: NotifyAdapter> DesktopNotifySubscriber<N> {
    pub fn new(adapter: N) -> Self {
        Self { adapter, pending: Mutex::new(Vec::new()) }
    }

    /// Wait for alerts still being delivered.
    pub async fn flush(&self) {
        let pending: Vec<_> = std::mem::take(&mut *self.pending.lock());
        for handle in pending {
            let _ = handle.await;
        }
    }
}

impl<N: NotifyAdapter> Subscriber for DesktopNotifySubscriber<N> {
    fn on_update(&self, _state: &JobState, _timeline: &Timeline) {}

    fn on_terminal(&self, outcome: JobOutcome, state: &JobState) {
        let notification = Notification::for_outcome(outcome, state);
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(title = %notification.title, "no runtime, dropping notification");
            return;
        };
        let adapter = self.adapter.clone();
        let handle = runtime.spawn(async move {
            if let Err(e) = adapter.notify(&notification).await {
                tracing::warn!(error = %e, "desktop notification failed");
            }
        });
        self.pending.lock().push(handle);
    }

    fn on_transient_error(&self, _message: &str) {}
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod recording {
    use super::{Subscriber, TrackerEvent};
    use parking_lot::Mutex;
    use pt_core::{JobOutcome, JobState, Timeline};

    /// Records every callback for later inspection
    #[derive(Default)]
    pub struct RecordingSubscriber {
        events: Mutex<Vec<TrackerEvent>>,
    }

    impl RecordingSubscriber {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<TrackerEvent> {
            self.events.lock().clone()
        }

        pub fn updates(&self) -> Vec<(JobState, Timeline)> {
            self.events
                .lock()
                .iter()
                .filter_map(|e| match e {
                    TrackerEvent::Update { state, timeline } => {
                        Some((state.clone(), timeline.clone()))
                    }
                    _ => None,
                })
                .collect()
        }

        pub fn terminals(&self) -> Vec<(JobOutcome, JobState)> {
            self.events
                .lock()
                .iter()
                .filter_map(|e| match e {
                    TrackerEvent::Terminal { outcome, state } => Some((*outcome, state.clone())),
                    _ => None,
                })
                .collect()
        }

        pub fn transient_errors(&self) -> Vec<String> {
            self.events
                .lock()
                .iter()
                .filter_map(|e| match e {
                    TrackerEvent::TransientError { message } => Some(message.clone()),
                    _ => None,
                })
                .collect()
        }
    }

    impl Subscriber for RecordingSubscriber {
        fn on_update(&self, state: &JobState, timeline: &Timeline) {
            self.events
                .lock()
                .push(TrackerEvent::Update { state: state.clone(), timeline: timeline.clone() });
        }

        fn on_terminal(&self, outcome: JobOutcome, state: &JobState) {
            self.events.lock().push(TrackerEvent::Terminal { outcome, state: state.clone() });
        }

        fn on_transient_error(&self, message: &str) {
            let event = TrackerEvent::TransientError { message: message.to_string() };
            self.events.lock().push(event);
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use recording::RecordingSubscriber;

#[cfg(test)]
#[path = "subscriber_tests.rs"]
mod tests;
