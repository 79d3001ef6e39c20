// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! provtrack: submit a provisioning job and follow it to completion

mod color;
mod commands;
mod config;
mod env;
mod exit_error;
mod lock;
mod logging;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::Context;
use crate::config::{ConfigError, Overrides, Settings};
use crate::exit_error::{ExitError, EXIT_JOB_FAILED, EXIT_USAGE};
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "provtrack",
    version,
    about = "Submit a provisioning job and follow it to completion",
    styles = color::styles()
)]
struct Cli {
    /// Output format
    #[arg(short = 'o', long, value_enum, global = true, default_value_t)]
    output: OutputFormat,

    /// Raise a desktop notification when the job finishes
    #[arg(long, global = true)]
    notify: bool,

    /// Control plane base URL (overrides PT_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// State directory holding the job reference and logs (overrides PT_STATE_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    state_dir: Option<PathBuf>,

    /// Poll interval in milliseconds (overrides PT_POLL_INTERVAL_MS)
    #[arg(long, global = true, value_name = "MS")]
    poll_interval_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a request (JSON file, or - for stdin) and watch the job
    Submit {
        request: PathBuf,
        /// Return once the job is accepted and persisted
        #[arg(long)]
        detach: bool,
    },
    /// Resume the persisted job and watch it to the end
    Watch,
    /// Fetch and print the persisted job's timeline once
    Status,
    /// Print the persisted job reference
    Show,
    /// Stop tracking the persisted job and clear its reference
    Forget,
}

impl Cli {
    fn flags(&self) -> Overrides {
        Overrides {
            api_url: self.api_url.clone(),
            state_dir: self.state_dir.clone(),
            poll_interval_ms: self.poll_interval_ms,
            ..Overrides::default()
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() { EXIT_USAGE } else { 0 });
        }
    };

    if let Err(e) = run(cli).await {
        std::process::exit(report(&e));
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.flags())?;
    let _log_guard = logging::init(&settings.state_dir)?;
    tracing::debug!(state_dir = %settings.state_dir.display(), "settings resolved");

    let ctx = Context { settings, format: cli.output, notify: cli.notify };
    let result = match &cli.command {
        Command::Submit { request, detach } => {
            commands::submit::handle(&ctx, request, *detach).await
        }
        Command::Watch => commands::watch::handle(&ctx).await,
        Command::Status => commands::status::handle(&ctx).await,
        Command::Show => commands::show::handle(&ctx),
        Command::Forget => commands::forget::handle(&ctx),
    };
    if let Err(e) = &result {
        tracing::error!(error = %format!("{e:#}"), "command failed");
    }
    result
}

/// Print `e` and pick the exit code.
fn report(e: &anyhow::Error) -> i32 {
    if let Some(exit) = e.downcast_ref::<ExitError>() {
        eprintln!("error: {}", exit.message);
        return exit.code;
    }
    eprintln!("error: {e:#}");
    if e.downcast_ref::<ConfigError>().is_some() {
        EXIT_USAGE
    } else {
        EXIT_JOB_FAILED
    }
}
