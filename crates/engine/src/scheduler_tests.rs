// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::time::Instant;
use yare::parameterized;

const INTERVAL: Duration = Duration::from_secs(5);

fn stop_after(n: u64) -> impl FnMut(u64, ()) -> ControlFlow<()> {
    move |seq, ()| if seq >= n { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
}

#[tokio::test(start_paused = true)]
async fn first_fetch_is_immediate_then_on_interval() {
    let scheduler = PollScheduler::new(INTERVAL, CancellationToken::new());
    let start = Instant::now();
    let mut seen = Vec::new();

    let report = scheduler
        .run(
            || async { Instant::now() },
            |seq, at: Instant| {
                seen.push((seq, at - start));
                if seq == 3 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            },
        )
        .await;

    assert_eq!(report.exit, PollExit::Finished);
    assert_eq!(report.dispatched, 3);
    assert_eq!(
        seen,
        vec![(1, Duration::ZERO), (2, INTERVAL), (3, INTERVAL * 2)],
    );
}

#[tokio::test(start_paused = true)]
async fn slow_fetch_skips_ticks_instead_of_overlapping() {
    let scheduler = PollScheduler::new(Duration::from_millis(100), CancellationToken::new());
    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let report = scheduler
        .run(
            || {
                let active = Arc::clone(&active);
                let peak = Arc::clone(&peak);
                async move {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(250)).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                }
            },
            stop_after(2),
        )
        .await;

    assert_eq!(report.exit, PollExit::Finished);
    assert_eq!(report.dispatched, 2);
    assert!(report.skipped_ticks >= 2, "skipped {}", report.skipped_ticks);
    assert_eq!(peak.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn cancellation_drops_outstanding_fetch() {
    let cancel = CancellationToken::new();
    let scheduler = PollScheduler::new(INTERVAL, cancel.clone());
    let mut results = 0;

    let canceller = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
    };
    let polling = scheduler.run(
        || tokio::time::sleep(Duration::from_millis(200)),
        |_, ()| {
            results += 1;
            ControlFlow::Continue(())
        },
    );
    let (report, ()) = tokio::join!(polling, canceller);

    assert_eq!(report.exit, PollExit::Cancelled);
    assert_eq!(report.dispatched, 1);
    assert_eq!(results, 0);
}

#[tokio::test(start_paused = true)]
async fn cancelled_token_never_dispatches() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let scheduler = PollScheduler::new(INTERVAL, cancel);

    let report = scheduler.run(|| async {}, stop_after(1)).await;

    assert_eq!(report.exit, PollExit::Cancelled);
    assert_eq!(report.dispatched, 0);
}

#[parameterized(
    zero = { Duration::ZERO, MIN_POLL_INTERVAL },
    below_floor = { Duration::from_millis(10), MIN_POLL_INTERVAL },
    at_floor = { MIN_POLL_INTERVAL, MIN_POLL_INTERVAL },
    above_floor = { Duration::from_secs(2), Duration::from_secs(2) },
)]
fn interval_is_clamped(requested: Duration, expected: Duration) {
    let scheduler = PollScheduler::new(requested, CancellationToken::new());
    assert_eq!(scheduler.interval(), expected);
}
