// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job tracker: submits one job, persists its reference, and polls it to a
//! terminal outcome.
//!
//! ```text
//! Idle -> Submitting -> Polling -> Succeeded | Failed | Abandoned
//! ```
//!
//! A tracker opened over a store that already holds a reference starts in
//! `Polling` for that job without re-submitting. The reference is cleared
//! only on a terminal outcome or by [`JobTracker::forget`].

use crate::config::TrackerConfig;
use crate::error::TrackError;
use crate::scheduler::{PollExit, PollScheduler};
use crate::subscriber::Subscriber;
use parking_lot::Mutex;
use pt_adapters::{ClientError, StatusClient};
use pt_core::{
    reconcile, terminal_outcome, validate_catalog, Clock, JobId, JobOutcome, JobRequest,
    JobState, PersistedJobRef, SystemClock, Timeline,
};
use pt_storage::JobStore;
use serde::Serialize;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerPhase {
    #[default]
    Idle,
    Submitting,
    Polling,
    Succeeded,
    Failed,
    Abandoned,
}

pt_core::simple_display! {
    TrackerPhase {
        Idle => "idle",
        Submitting => "submitting",
        Polling => "polling",
        Succeeded => "succeeded",
        Failed => "failed",
        Abandoned => "abandoned",
    }
}

impl TrackerPhase {
    pub fn is_finished(&self) -> bool {
        matches!(self, TrackerPhase::Succeeded | TrackerPhase::Failed | TrackerPhase::Abandoned)
    }
}

/// How a call to [`JobTracker::run`] ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackOutcome {
    Succeeded(JobState),
    Failed(JobState),
    /// Tracking stopped before the job finished; the reference is kept.
    Abandoned,
}

impl TrackOutcome {
    fn from_terminal(outcome: JobOutcome, state: JobState) -> Self {
        match outcome {
            JobOutcome::Succeeded => TrackOutcome::Succeeded(state),
            JobOutcome::Failed => TrackOutcome::Failed(state),
        }
    }

    pub fn state(&self) -> Option<&JobState> {
        match self {
            TrackOutcome::Succeeded(state) | TrackOutcome::Failed(state) => Some(state),
            TrackOutcome::Abandoned => None,
        }
    }
}

/// Point-in-time view of the tracker for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrackerView {
    pub phase: TrackerPhase,
    pub job_id: Option<JobId>,
    pub state: Option<JobState>,
    pub timeline: Timeline,
    /// Most recent poll failure, cleared by the next successful poll
    pub last_error: Option<String>,
    pub outcome: Option<JobOutcome>,
    pub polls: u64,
    pub failed_polls: u64,
    pub skipped_ticks: u64,
    pub last_polled_at_ms: Option<u64>,
}

/// A status fetch result with its round-trip time in milliseconds
type Polled = (Result<JobState, ClientError>, u64);

struct TrackerInner {
    phase: TrackerPhase,
    job: Option<PersistedJobRef>,
    terminal: Option<TrackOutcome>,
}

pub struct JobTracker<C, S, K = SystemClock> {
    client: Arc<C>,
    store: S,
    clock: K,
    config: TrackerConfig,
    subscribers: Mutex<Vec<Arc<dyn Subscriber>>>,
    cancel: CancellationToken,
    inner: Mutex<TrackerInner>,
    running: AtomicBool,
    view: watch::Sender<TrackerView>,
}

impl<C, S> JobTracker<C, S, SystemClock>
where
    C: StatusClient,
    S: JobStore,
{
    pub fn open(client: C, store: S, config: TrackerConfig) -> Result<Self, TrackError> {
        Self::open_with_clock(client, store, SystemClock, config)
    }
}

impl<C, S, K> JobTracker<C, S, K>
where
    C: StatusClient,
    S: JobStore,
    K: Clock,
{
    /// Open a tracker over `store`, resuming any job it already references.
    pub fn open_with_clock(
        client: C,
        store: S,
        clock: K,
        config: TrackerConfig,
    ) -> Result<Self, TrackError> {
        validate_catalog(&config.steps)?;
        let job = store.load()?;

        let phase = match &job {
            Some(job_ref) => {
                tracing::info!(
                    job_id = %job_ref.job_id,
                    correlation_id = %job_ref.correlation.correlation_id,
                    "resuming tracked job",
                );
                TrackerPhase::Polling
            }
            None => TrackerPhase::Idle,
        };

        let initial = TrackerView {
            phase,
            job_id: job.as_ref().map(|j| j.job_id.clone()),
            timeline: reconcile(&config.steps, None),
            ..TrackerView::default()
        };
        let (view, _) = watch::channel(initial);

        Ok(Self {
            client: Arc::new(client),
            store,
            clock,
            config,
            subscribers: Mutex::new(Vec::new()),
            cancel: CancellationToken::new(),
            inner: Mutex::new(TrackerInner { phase, job, terminal: None }),
            running: AtomicBool::new(false),
            view,
        })
    }

    pub fn subscribe(&self, subscriber: Arc<dyn Subscriber>) {
        self.subscribers.lock().push(subscriber);
    }

    pub fn phase(&self) -> TrackerPhase {
        self.inner.lock().phase
    }

    pub fn job_id(&self) -> Option<JobId> {
        self.inner.lock().job.as_ref().map(|j| j.job_id.clone())
    }

    pub fn job_ref(&self) -> Option<PersistedJobRef> {
        self.inner.lock().job.clone()
    }

    pub fn view(&self) -> TrackerView {
        self.view.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<TrackerView> {
        self.view.subscribe()
    }

    /// Token cancelled by [`JobTracker::stop`]; callers may cancel it too.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Submit `request` and persist the accepted job.
    ///
    /// Nothing is persisted unless the submission is accepted. A stop
    /// requested mid-submission still persists an accepted job, leaving the
    /// tracker abandoned so the job can be resumed later.
    pub async fn start(&self, request: JobRequest) -> Result<JobId, TrackError> {
        {
            let mut inner = self.inner.lock();
            match inner.phase {
                TrackerPhase::Idle => {}
                TrackerPhase::Submitting => return Err(TrackError::Submitting),
                TrackerPhase::Abandoned => return Err(TrackError::Stopped),
                _ => {
                    return Err(match &inner.job {
                        Some(job_ref) => TrackError::AlreadyTracking(job_ref.job_id.clone()),
                        None => TrackError::Stopped,
                    })
                }
            }
            self.set_phase(&mut inner, TrackerPhase::Submitting);
        }

        let started = Instant::now();
        let span = tracing::info_span!("submit", label = request.label().unwrap_or(""));
        let submitted = self.client.submit(&request).instrument(span).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let handle = match submitted {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(error = %e, elapsed_ms, "submission rejected");
                let mut inner = self.inner.lock();
                let phase = if self.cancel.is_cancelled() {
                    TrackerPhase::Abandoned
                } else {
                    TrackerPhase::Idle
                };
                self.set_phase(&mut inner, phase);
                drop(inner);
                self.view.send_modify(|v| v.last_error = Some(e.to_string()));
                return Err(e.into());
            }
        };

        let job_ref = PersistedJobRef::new(&handle, request, self.clock.epoch_ms());
        let mut inner = self.inner.lock();
        if let Err(source) = self.store.save(&job_ref) {
            tracing::error!(job_id = %handle.id, error = %source, "failed to persist accepted job");
            self.set_phase(&mut inner, TrackerPhase::Idle);
            return Err(TrackError::Persist { job_id: handle.id, source });
        }

        tracing::info!(
            job_id = %handle.id,
            correlation_id = %job_ref.correlation.correlation_id,
            status = %handle.initial_status,
            elapsed_ms,
            "job accepted",
        );
        inner.job = Some(job_ref);
        let phase = if self.cancel.is_cancelled() {
            TrackerPhase::Abandoned
        } else {
            TrackerPhase::Polling
        };
        self.set_phase(&mut inner, phase);
        drop(inner);
        self.view.send_modify(|v| {
            v.job_id = Some(handle.id.clone());
            v.last_error = None;
        });
        Ok(handle.id)
    }

    /// Poll the tracked job until it finishes, fails authentication, or the
    /// tracker is stopped.
    pub async fn run(&self) -> Result<TrackOutcome, TrackError> {
        let job_id = {
            let inner = self.inner.lock();
            if let Some(outcome) = &inner.terminal {
                return Ok(outcome.clone());
            }
            match inner.phase {
                TrackerPhase::Polling => {}
                TrackerPhase::Idle => return Err(TrackError::NothingToTrack),
                TrackerPhase::Submitting => return Err(TrackError::Submitting),
                _ => return Ok(TrackOutcome::Abandoned),
            }
            match &inner.job {
                Some(job_ref) => job_ref.job_id.clone(),
                None => return Err(TrackError::NothingToTrack),
            }
        };

        if self.running.swap(true, Ordering::SeqCst) {
            return Err(TrackError::AlreadyRunning);
        }
        let _running = RunningGuard(&self.running);

        let scheduler = PollScheduler::new(self.config.poll_interval, self.cancel.clone());
        let mut finished: Option<Result<TrackOutcome, TrackError>> = None;
        let span = tracing::info_span!("track", job_id = %job_id);

        let report = scheduler
            .run(
                || {
                    let client = Arc::clone(&self.client);
                    let job_id = job_id.clone();
                    async move {
                        let started = Instant::now();
                        let result = client.fetch_status(&job_id).await;
                        (result, started.elapsed().as_millis() as u64)
                    }
                },
                |seq, (result, elapsed_ms): Polled| {
                    match self.apply(&job_id, seq, result, elapsed_ms) {
                        ControlFlow::Continue(()) => ControlFlow::Continue(()),
                        ControlFlow::Break(done) => {
                            finished = Some(done);
                            ControlFlow::Break(())
                        }
                    }
                },
            )
            .instrument(span)
            .await;

        self.view.send_modify(|v| v.skipped_ticks += report.skipped_ticks);
        tracing::debug!(
            job_id = %job_id,
            cancelled = report.exit == PollExit::Cancelled,
            dispatched = report.dispatched,
            skipped_ticks = report.skipped_ticks,
            "polling ended",
        );

        match finished {
            Some(done) if !matches!(done, Ok(TrackOutcome::Abandoned)) => done,
            _ => {
                let mut inner = self.inner.lock();
                if let Some(outcome) = &inner.terminal {
                    return Ok(outcome.clone());
                }
                self.set_phase(&mut inner, TrackerPhase::Abandoned);
                tracing::info!(job_id = %job_id, "tracking stopped, job reference kept");
                Ok(TrackOutcome::Abandoned)
            }
        }
    }

    fn apply(
        &self,
        job_id: &JobId,
        seq: u64,
        result: Result<JobState, ClientError>,
        elapsed_ms: u64,
    ) -> ControlFlow<Result<TrackOutcome, TrackError>> {
        if self.cancel.is_cancelled() {
            return ControlFlow::Break(Ok(TrackOutcome::Abandoned));
        }

        let state = match result {
            Ok(mut state) if state.id.is_empty() => {
                state.id = job_id.clone();
                state
            }
            Ok(state) if state.id == *job_id => state,
            Ok(state) => {
                let message = format!("status response was for job {}", state.id);
                self.transient_failure(job_id, &message, elapsed_ms);
                return ControlFlow::Continue(());
            }
            Err(e) if e.is_transient() => {
                self.transient_failure(job_id, &e.to_string(), elapsed_ms);
                return ControlFlow::Continue(());
            }
            Err(e) => {
                tracing::error!(
                    job_id = %job_id,
                    error = %e,
                    "polling stopped, job reference kept",
                );
                let mut inner = self.inner.lock();
                self.set_phase(&mut inner, TrackerPhase::Abandoned);
                drop(inner);
                self.view.send_modify(|v| {
                    v.failed_polls += 1;
                    v.last_error = Some(e.to_string());
                });
                return ControlFlow::Break(Err(e.into()));
            }
        };

        let timeline = reconcile(&self.config.steps, Some(&state));
        tracing::debug!(
            job_id = %job_id,
            seq,
            status = %state.status,
            active = timeline.active_index,
            elapsed_ms,
            "poll applied",
        );
        let polled_at = self.clock.epoch_ms();
        self.view.send_modify(|v| {
            v.state = Some(state.clone());
            v.timeline = timeline.clone();
            v.polls += 1;
            v.last_error = None;
            v.last_polled_at_ms = Some(polled_at);
        });

        let subscribers = self.subscribers();
        for subscriber in &subscribers {
            subscriber.on_update(&state, &timeline);
        }

        let Some(outcome) = terminal_outcome(&state.status) else {
            return ControlFlow::Continue(());
        };

        {
            let mut inner = self.inner.lock();
            if let Some(done) = &inner.terminal {
                return ControlFlow::Break(Ok(done.clone()));
            }
            if let Err(e) = self.store.clear() {
                tracing::warn!(job_id = %job_id, error = %e, "failed to clear job reference");
            }
            inner.terminal = Some(TrackOutcome::from_terminal(outcome, state.clone()));
            let phase = match outcome {
                JobOutcome::Succeeded => TrackerPhase::Succeeded,
                JobOutcome::Failed => TrackerPhase::Failed,
            };
            self.set_phase(&mut inner, phase);
        }
        self.view.send_modify(|v| v.outcome = Some(outcome));

        tracing::info!(job_id = %job_id, %outcome, status = %state.status, "job finished");
        for subscriber in &subscribers {
            subscriber.on_terminal(outcome, &state);
        }
        ControlFlow::Break(Ok(TrackOutcome::from_terminal(outcome, state)))
    }

    fn transient_failure(&self, job_id: &JobId, message: &str, elapsed_ms: u64) {
        tracing::warn!(job_id = %job_id, error = message, elapsed_ms, "poll failed, will retry");
        self.view.send_modify(|v| {
            v.failed_polls += 1;
            v.last_error = Some(message.to_string());
        });
        for subscriber in self.subscribers() {
            subscriber.on_transient_error(message);
        }
    }

    /// Stop polling. Late responses are dropped and the reference is kept.
    pub fn stop(&self) {
        self.cancel.cancel();
        let mut inner = self.inner.lock();
        if !inner.phase.is_finished() && inner.phase != TrackerPhase::Submitting {
            self.set_phase(&mut inner, TrackerPhase::Abandoned);
        }
    }

    /// Stop polling and clear the persisted reference.
    ///
    /// Returns the id of the job that was being tracked, if any.
    pub fn forget(&self) -> Result<Option<JobId>, TrackError> {
        self.stop();
        self.store.clear()?;
        let job_id = self.job_id();
        if let Some(id) = &job_id {
            tracing::info!(job_id = %id, "job reference cleared");
        }
        Ok(job_id)
    }

    fn subscribers(&self) -> Vec<Arc<dyn Subscriber>> {
        self.subscribers.lock().clone()
    }

    fn set_phase(&self, inner: &mut TrackerInner, phase: TrackerPhase) {
        inner.phase = phase;
        self.view.send_modify(|v| v.phase = phase);
    }
}

impl<C, S, K> Drop for JobTracker<C, S, K> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
