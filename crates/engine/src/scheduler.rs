// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Poll scheduler: one ticker, at most one outstanding fetch.
//!
//! The first tick fires immediately. A tick that fires while a fetch is
//! still outstanding is skipped, never queued. Cancellation is checked
//! before anything else on every wakeup, so a response that lands after
//! cancellation is dropped unseen.

use std::future::Future;
use std::ops::ControlFlow;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Shortest accepted poll interval
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Why the scheduler returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollExit {
    /// The result handler asked to stop
    Finished,
    /// The cancellation token fired
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollReport {
    pub exit: PollExit,
    /// Fetches started
    pub dispatched: u64,
    /// Ticks that fired while a fetch was outstanding
    pub skipped_ticks: u64,
    /// Results dropped because a newer result was already applied
    pub discarded: u64,
}

pub struct PollScheduler {
    interval: Duration,
    cancel: CancellationToken,
}

type InFlight<Fut> = Option<(u64, Pin<Box<Fut>>)>;

impl PollScheduler {
    pub fn new(interval: Duration, cancel: CancellationToken) -> Self {
        Self { interval: interval.max(MIN_POLL_INTERVAL), cancel }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Drive `fetch` on the ticker until `on_result` breaks or the token is
    /// cancelled.
    ///
    /// `on_result` receives each result with the sequence number of the
    /// fetch that produced it, strictly in completion order.
    pub async fn run<F, Fut, H>(&self, mut fetch: F, mut on_result: H) -> PollReport
    where
        F: FnMut() -> Fut,
        Fut: Future,
        H: FnMut(u64, Fut::Output) -> ControlFlow<()>,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut in_flight: InFlight<Fut> = None;
        let mut report =
            PollReport { exit: PollExit::Cancelled, dispatched: 0, skipped_ticks: 0, discarded: 0 };
        let mut last_applied: Option<u64> = None;

        loop {
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => {
                    if in_flight.is_some() {
                        tracing::debug!("cancelled with fetch outstanding, dropping it");
                    }
                    report.exit = PollExit::Cancelled;
                    return report;
                }

                (seq, output) = settle(&mut in_flight), if in_flight.is_some() => {
                    in_flight = None;
                    if last_applied.is_some_and(|last| seq <= last) {
                        tracing::debug!(seq, "discarding stale poll result");
                        report.discarded += 1;
                        continue;
                    }
                    last_applied = Some(seq);
                    if on_result(seq, output).is_break() {
                        report.exit = PollExit::Finished;
                        return report;
                    }
                }

                _ = ticker.tick() => {
                    if in_flight.is_some() {
                        tracing::trace!("poll still outstanding, skipping tick");
                        report.skipped_ticks += 1;
                        continue;
                    }
                    report.dispatched += 1;
                    in_flight = Some((report.dispatched, Box::pin(fetch())));
                }
            }
        }
    }
}

/// Await the outstanding fetch. Only polled when one exists.
async fn settle<Fut: Future>(slot: &mut InFlight<Fut>) -> (u64, Fut::Output) {
    match slot {
        Some((seq, fut)) => (*seq, fut.as_mut().await),
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
