// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `provtrack status` - fetch and print the tracked job once
//!
//! Read-only: never writes or clears the persisted reference, even when the
//! job has finished.

use anyhow::Result;
use pt_adapters::StatusClient;
use pt_core::reconcile;
use pt_storage::JobStore;

use super::{client_error, Context};
use crate::exit_error::ExitError;
use crate::output::{print_json, render_timeline, OutputFormat};

pub async fn handle(ctx: &Context) -> Result<()> {
    let Some(job_ref) = ctx.store().load()? else {
        return Err(ExitError::nothing_to_track().into());
    };
    let client = ctx.client()?;
    let mut state = client.fetch_status(&job_ref.job_id).await.map_err(client_error)?;
    if state.id.is_empty() {
        state.id = job_ref.job_id.clone();
    }
    let timeline = reconcile(&ctx.settings.steps, Some(&state));

    match ctx.format {
        OutputFormat::Text => print!("{}", render_timeline(Some(&state), &timeline)),
        OutputFormat::Json => print_json(&serde_json::json!({
            "job_id": job_ref.job_id,
            "terminal": state.is_terminal(),
            "state": state,
            "timeline": timeline,
        }))?,
    }
    Ok(())
}
