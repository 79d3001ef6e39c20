// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `provtrack submit` - submit a request and follow the job

use std::path::Path;

use anyhow::{Context as _, Result};
use pt_core::JobRequest;

use super::{track, track_error, Context};
use crate::exit_error::{ExitError, EXIT_USAGE};
use crate::lock::TrackerLock;
use crate::output::{print_json, OutputFormat};

pub async fn handle(ctx: &Context, request_path: &Path, detach: bool) -> Result<()> {
    let request = read_request(request_path)?;
    let _lock = TrackerLock::acquire(&ctx.settings.state_dir)?;
    let tracker = ctx.open_tracker()?;

    let job_id = tracker.start(request).await.map_err(track_error)?;
    match ctx.format {
        OutputFormat::Text => println!("Submitted job {job_id}"),
        OutputFormat::Json if detach => {
            print_json(&serde_json::json!({ "job_id": job_id, "detached": true }))?
        }
        OutputFormat::Json => {}
    }

    if detach {
        return Ok(());
    }
    track::follow(ctx, &tracker).await
}

/// Read a JSON object request from `path` (`-` for stdin).
pub fn read_request(path: &Path) -> Result<JobRequest> {
    let text = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin()).context("cannot read request from stdin")?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("cannot read request {}", path.display()))?
    };
    let payload: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
        ExitError::new(EXIT_USAGE, format!("request {} is not valid JSON: {e}", path.display()))
    })?;
    if !payload.is_object() {
        return Err(ExitError::new(
            EXIT_USAGE,
            format!("request {} must be a JSON object", path.display()),
        )
        .into());
    }
    Ok(JobRequest::new(payload))
}

#[cfg(test)]
#[path = "submit_tests.rs"]
mod tests;
