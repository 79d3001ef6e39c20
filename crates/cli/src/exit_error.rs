// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to flush logs before terminating.

use std::fmt;

/// The tracked job finished unsuccessfully
pub const EXIT_JOB_FAILED: i32 = 1;
/// Credentials were missing or rejected
pub const EXIT_AUTH: i32 = 2;
/// No job to act on, or the invocation cannot proceed as given
pub const EXIT_USAGE: i32 = 3;
/// Tracking was interrupted; the job reference is kept
pub const EXIT_INTERRUPTED: i32 = 130;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn nothing_to_track() -> Self {
        Self::new(EXIT_USAGE, "no job is being tracked")
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}
