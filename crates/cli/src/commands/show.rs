// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `provtrack show` - print the persisted job reference

use anyhow::Result;
use pt_storage::JobStore;

use super::Context;
use crate::output::{now_ms, print_json, render_job_ref, OutputFormat};

pub fn handle(ctx: &Context) -> Result<()> {
    let job_ref = ctx.store().load()?;
    match (ctx.format, job_ref) {
        (OutputFormat::Json, job_ref) => print_json(&job_ref)?,
        (OutputFormat::Text, Some(job_ref)) => print!("{}", render_job_ref(&job_ref, now_ms())),
        (OutputFormat::Text, None) => println!("No job is being tracked"),
    }
    Ok(())
}
