// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for commands that read or clear the persisted job reference

use crate::prelude::*;

#[test]
fn show_with_empty_state_dir() {
    let temp = Project::empty();
    temp.provtrack().args(&["show"]).passes().stdout_has("No job is being tracked");
}

#[test]
fn show_json_with_empty_state_dir_is_null() {
    let temp = Project::empty();
    let out = temp.provtrack().args(&["show", "--output", "json"]).passes();
    similar_asserts::assert_eq!(out.stdout().trim(), "null");
}

#[test]
fn show_prints_persisted_job() {
    let temp = Project::empty();
    temp.persist_job("job-42");

    temp.provtrack()
        .args(&["show"])
        .passes()
        .stdout_has("job-42")
        .stdout_has("billing-db")
        .stdout_has("QUEUED");
}

#[test]
fn show_json_round_trips_reference() {
    let temp = Project::empty();
    temp.persist_job("job-42");

    let out = temp.provtrack().args(&["-o", "json", "show"]).passes();
    let value: serde_json::Value = serde_json::from_str(out.stdout()).unwrap();
    assert_eq!(value["job_id"], "job-42");
    assert_eq!(value["correlation"]["request"]["name"], "billing-db");
}

#[test]
fn forget_clears_reference() {
    let temp = Project::empty();
    temp.persist_job("job-42");

    temp.provtrack().args(&["forget"]).passes().stdout_has("Forgot job job-42");
    assert!(!temp.job_file().exists());
    temp.provtrack().args(&["show"]).passes().stdout_has("No job is being tracked");
}

#[test]
fn forget_with_nothing_tracked_is_ok() {
    let temp = Project::empty();
    temp.provtrack().args(&["forget"]).passes().stdout_has("No job is being tracked");
}

#[test]
fn forget_clears_unreadable_file() {
    let temp = Project::empty();
    temp.file("state/job.json", "{ not json");

    temp.provtrack().args(&["forget"]).passes();
    assert!(!temp.job_file().exists());
}

#[test]
fn status_without_job_exits_with_usage_code() {
    let temp = Project::empty();
    temp.provtrack()
        .args(&["status"])
        .exits_with(3)
        .stderr_has("no job is being tracked");
}

#[test]
fn watch_without_job_exits_with_usage_code() {
    let temp = Project::empty();
    temp.provtrack()
        .env("PT_API_URL", "http://127.0.0.1:9")
        .args(&["watch"])
        .exits_with(3)
        .stderr_has("no job is being tracked");
}

#[test]
fn status_against_unreachable_control_plane_keeps_reference() {
    let temp = Project::empty();
    temp.persist_job("job-42");

    temp.provtrack()
        .env("PT_API_URL", "http://127.0.0.1:9")
        .env("PT_API_TOKEN", "token")
        .env("PT_REQUEST_TIMEOUT_MS", "2000")
        .args(&["status"])
        .exits_with(1)
        .stderr_has("request failed");
    assert!(temp.job_file().exists());
}

#[test]
fn corrupt_job_file_is_reported() {
    let temp = Project::empty();
    temp.file("state/job.json", "{ not json");

    temp.provtrack().args(&["show"]).exits_with(1).stderr_has("corrupt job file");
}

#[test]
fn logs_go_to_state_dir() {
    let temp = Project::empty();
    temp.provtrack().args(&["show"]).passes();
    assert!(temp.state_dir().join("logs").is_dir());
}
