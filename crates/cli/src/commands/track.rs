// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Follow a tracker to its outcome, printing progress as it arrives.

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use pt_adapters::DesktopNotifyAdapter;
use pt_engine::{ChannelSubscriber, DesktopNotifySubscriber, TrackOutcome, TrackerEvent};
use tokio::sync::mpsc::UnboundedReceiver;

use super::{track_error, Context, Tracker};
use crate::exit_error::{ExitError, EXIT_INTERRUPTED, EXIT_JOB_FAILED};
use crate::output::{format_job_line, EventPrinter, OutputFormat};

pub async fn follow(ctx: &Context, tracker: &Tracker) -> Result<()> {
    let (channel, mut events) = ChannelSubscriber::new();
    tracker.subscribe(Arc::new(channel));
    let notifier = ctx
        .notify
        .then(|| Arc::new(DesktopNotifySubscriber::new(DesktopNotifyAdapter::new())));
    if let Some(notifier) = &notifier {
        tracker.subscribe(notifier.clone());
    }

    let mut printer = EventPrinter::new(ctx.format);
    let result = drive(
        tracker.run(),
        &mut events,
        tokio::signal::ctrl_c(),
        || tracker.stop(),
        |event| print(&mut printer, event),
    )
    .await?;
    if let Some(notifier) = &notifier {
        notifier.flush().await;
    }

    let job_id = tracker.job_id().map(|id| id.to_string()).unwrap_or_default();
    match result.map_err(track_error)? {
        TrackOutcome::Succeeded(state) => {
            if ctx.format == OutputFormat::Text {
                println!("{} succeeded", format_job_line(&state));
            }
            Ok(())
        }
        TrackOutcome::Failed(state) => {
            let detail = state.error.clone().unwrap_or_else(|| state.status.clone());
            let message = format!("job {} failed: {detail}", state.id);
            Err(ExitError::new(EXIT_JOB_FAILED, message).into())
        }
        TrackOutcome::Abandoned => Err(ExitError::new(
            EXIT_INTERRUPTED,
            format!("stopped tracking job {job_id}; resume with `provtrack watch`"),
        )
        .into()),
    }
}

/// Await `run` while forwarding events, calling `stop` once when `interrupt`
/// completes. Events still queued after `run` finishes are forwarded too.
///
/// `interrupt` is a single pinned future, so a signal that lands while another
/// branch is being handled is still observed on the next iteration.
pub(crate) async fn drive<T>(
    run: impl Future<Output = T>,
    events: &mut UnboundedReceiver<TrackerEvent>,
    interrupt: impl Future,
    stop: impl Fn(),
    mut on_event: impl FnMut(&TrackerEvent) -> Result<()>,
) -> Result<T> {
    tokio::pin!(run);
    tokio::pin!(interrupt);
    let mut interrupted = false;

    let result = loop {
        tokio::select! {
            result = &mut run => break result,
            Some(event) = events.recv() => on_event(&event)?,
            _ = &mut interrupt, if !interrupted => {
                interrupted = true;
                tracing::info!("interrupted, stopping tracker");
                stop();
            }
        }
    };
    while let Ok(event) = events.try_recv() {
        on_event(&event)?;
    }
    Ok(result)
}

fn print(printer: &mut EventPrinter, event: &TrackerEvent) -> Result<()> {
    if let Some(text) = printer.render(event)? {
        if text.ends_with('\n') {
            print!("{text}");
        } else {
            println!("{text}");
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "track_tests.rs"]
mod tests;
