// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `provtrack forget` - abandon the persisted job

use anyhow::Result;
use pt_storage::JobStore;

use super::Context;
use crate::lock::TrackerLock;
use crate::output::{print_json, OutputFormat};

pub fn handle(ctx: &Context) -> Result<()> {
    let _lock = TrackerLock::acquire(&ctx.settings.state_dir)?;
    let store = ctx.store();
    // An unreadable file is still cleared
    let forgotten = match store.load() {
        Ok(job_ref) => job_ref.map(|job_ref| job_ref.job_id),
        Err(e) => {
            tracing::warn!(error = %e, "clearing unreadable job file");
            None
        }
    };
    store.clear()?;
    if let Some(job_id) = &forgotten {
        tracing::info!(job_id = %job_id, "job reference cleared");
    }

    match (ctx.format, &forgotten) {
        (OutputFormat::Json, _) => print_json(&serde_json::json!({ "forgotten": forgotten }))?,
        (OutputFormat::Text, Some(job_id)) => println!("Forgot job {job_id}"),
        (OutputFormat::Text, None) => println!("No job is being tracked"),
    }
    Ok(())
}
