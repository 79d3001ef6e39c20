// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File logging. Stdout is reserved for command output.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub fn log_dir(state_dir: &Path) -> PathBuf {
    state_dir.join("logs")
}

/// Install a daily-rotated file subscriber under `<state_dir>/logs`.
///
/// The returned guard flushes buffered lines when dropped.
pub fn init(state_dir: &Path) -> anyhow::Result<WorkerGuard> {
    let dir = log_dir(state_dir);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("cannot create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::daily(&dir, "provtrack.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let directive = crate::env::log_filter();
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("invalid PT_LOG filter '{directive}'"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("cannot install log subscriber: {e}"))?;

    Ok(guard)
}
