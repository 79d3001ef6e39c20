// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Submission specs that never reach a control plane

use crate::prelude::*;

#[test]
fn submit_without_api_url_is_usage_error() {
    let temp = Project::empty();
    let request = temp.file("request.json", r#"{ "name": "web" }"#);

    temp.provtrack()
        .args(&["submit", request.to_str().unwrap()])
        .exits_with(3)
        .stderr_has("no API URL configured");
    assert!(!temp.job_file().exists());
}

#[test]
fn submit_without_token_is_auth_error() {
    let temp = Project::empty();
    let request = temp.file("request.json", r#"{ "name": "web" }"#);

    temp.provtrack()
        .env("PT_API_URL", "http://127.0.0.1:9")
        .args(&["submit", request.to_str().unwrap()])
        .exits_with(2)
        .stderr_has("authentication failed");
    assert!(!temp.job_file().exists());
}

#[test]
fn submit_rejects_invalid_json() {
    let temp = Project::empty();
    let request = temp.file("request.json", "name = web");

    temp.provtrack()
        .env("PT_API_URL", "http://127.0.0.1:9")
        .args(&["submit", request.to_str().unwrap()])
        .exits_with(3)
        .stderr_has("not valid JSON");
}

#[test]
fn submit_while_tracking_is_refused() {
    let temp = Project::empty();
    temp.persist_job("job-42");
    let request = temp.file("request.json", r#"{ "name": "web" }"#);

    temp.provtrack()
        .env("PT_API_URL", "http://127.0.0.1:9")
        .env("PT_API_TOKEN", "token")
        .args(&["submit", request.to_str().unwrap()])
        .exits_with(3)
        .stderr_has("already tracking job job-42");
}

#[test]
fn invalid_config_file_is_usage_error() {
    let temp = Project::empty();
    let config = temp.file("custom.toml", "poll_interval_ms = \"soon\"");

    temp.provtrack()
        .env("PT_CONFIG", config)
        .args(&["show"])
        .exits_with(3)
        .stderr_has("invalid config");
}

#[test]
fn config_file_supplies_api_url() {
    let temp = Project::empty();
    temp.file("config/provtrack/config.toml", "api_url = \"http://127.0.0.1:9\"\n");

    temp.provtrack().args(&["watch"]).exits_with(3).stderr_has("no job is being tracked");
}

#[test]
fn submit_with_malformed_api_url_is_usage_error() {
    let temp = Project::empty();
    let request = temp.file("request.json", r#"{ "name": "web" }"#);

    temp.provtrack()
        .env("PT_API_URL", "control-plane")
        .env("PT_API_TOKEN", "token")
        .args(&["submit", request.to_str().unwrap()])
        .exits_with(3)
        .stderr_has("invalid API URL");
    assert!(!temp.job_file().exists());
}
