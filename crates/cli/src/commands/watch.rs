// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `provtrack watch` - resume the persisted job and follow it

use anyhow::Result;
use pt_engine::TrackerPhase;

use super::{track, Context};
use crate::exit_error::ExitError;
use crate::lock::TrackerLock;
use crate::output::OutputFormat;

pub async fn handle(ctx: &Context) -> Result<()> {
    let _lock = TrackerLock::acquire(&ctx.settings.state_dir)?;
    let tracker = ctx.open_tracker()?;
    if tracker.phase() == TrackerPhase::Idle {
        return Err(ExitError::nothing_to_track().into());
    }
    if let (OutputFormat::Text, Some(job_id)) = (ctx.format, tracker.job_id()) {
        println!("Watching job {job_id}");
    }
    track::follow(ctx, &tracker).await
}
