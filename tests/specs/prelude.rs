// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared harness for CLI specs.

use std::path::PathBuf;

use tempfile::TempDir;

/// Variables that would leak the developer's setup into a spec.
const ISOLATED_VARS: &[&str] = &[
    "PT_API_URL",
    "PT_API_TOKEN",
    "PT_POLL_INTERVAL_MS",
    "PT_REQUEST_TIMEOUT_MS",
    "PT_STATE_DIR",
    "PT_CONFIG",
    "PT_LOG",
];

/// A `provtrack` invocation with no project context.
pub fn cli() -> Cli {
    let mut cmd = assert_cmd::Command::cargo_bin("provtrack").expect("provtrack binary");
    for name in ISOLATED_VARS {
        cmd.env_remove(name);
    }
    cmd.env("NO_COLOR", "1");
    Cli { cmd }
}

/// Isolated state and config directories.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self { dir: TempDir::new().expect("temp dir") }
    }

    pub fn state_dir(&self) -> PathBuf {
        self.dir.path().join("state")
    }

    /// Write `contents` to `rel` under the project root.
    pub fn file(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(&path, contents).expect("write file");
        path
    }

    /// Leave a persisted job reference behind, as an earlier run would.
    pub fn persist_job(&self, job_id: &str) {
        let envelope = serde_json::json!({
            "v": 1,
            "saved_at": "2026-01-01T00:00:00Z",
            "job": {
                "job_id": job_id,
                "correlation": {
                    "correlation_id": "trk-0123456789abcdefghi",
                    "submitted_at_ms": 1_700_000_000_000u64,
                    "initial_status": "QUEUED",
                    "request": { "name": "billing-db" }
                }
            }
        });
        self.file("state/job.json", &envelope.to_string());
    }

    pub fn job_file(&self) -> PathBuf {
        self.state_dir().join("job.json")
    }

    pub fn provtrack(&self) -> Cli {
        let mut cli = cli();
        cli.cmd
            .env("PT_STATE_DIR", self.state_dir())
            .env("XDG_CONFIG_HOME", self.dir.path().join("config"));
        cli
    }
}

pub struct Cli {
    cmd: assert_cmd::Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn passes(self) -> Output {
        self.exits_with(0)
    }

    pub fn exits_with(mut self, code: i32) -> Output {
        let output = self.cmd.output().expect("run provtrack");
        let out = Output {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        assert_eq!(
            output.status.code(),
            Some(code),
            "unexpected exit status\nstdout:\n{}\nstderr:\n{}",
            out.stdout,
            out.stderr
        );
        out
    }
}

pub struct Output {
    stdout: String,
    stderr: String,
}

impl Output {
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout missing {needle:?}:\n{}", self.stdout);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr missing {needle:?}:\n{}", self.stderr);
        self
    }
}
