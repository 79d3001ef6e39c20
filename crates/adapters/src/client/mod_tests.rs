// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;

#[yare::parameterized(
    authentication = { ClientError::Authentication("expired".into()),   false },
    authorization  = { ClientError::Authorization("forbidden".into()),  false },
    request        = { ClientError::request("connection reset"),        true },
    http_5xx       = { ClientError::Request { status: Some(503), message: "busy".into() }, true },
)]
fn transient_only_for_request_errors(error: ClientError, expected: bool) {
    assert_eq!(error.is_transient(), expected);
}

#[test]
fn error_display() {
    assert_eq!(
        ClientError::Authentication("no token".into()).to_string(),
        "authentication failed: no token"
    );
    assert_eq!(ClientError::request("boom").to_string(), "request failed: boom");
}

#[tokio::test]
async fn fake_replays_script_then_repeats_last() {
    let client = FakeStatusClient::new();
    client
        .push_status(Ok(JobState::builder().status("RUNNING").build()))
        .push_status(Ok(JobState::builder().status("SUCCEEDED").build()));
    let id = JobId::new("job-1");

    assert_eq!(client.fetch_status(&id).await.unwrap().status, "RUNNING");
    assert_eq!(client.fetch_status(&id).await.unwrap().status, "SUCCEEDED");
    assert_eq!(client.fetch_status(&id).await.unwrap().status, "SUCCEEDED");
    assert_eq!(client.fetch_count(), 3);
    assert_eq!(client.submit_count(), 0);
}

#[tokio::test]
async fn fake_without_script_errors() {
    let client = FakeStatusClient::new();
    let err = client.submit(&JobRequest::new(serde_json::Value::Null)).await.unwrap_err();
    assert!(err.is_transient());
    assert_eq!(client.calls(), [ClientCall::Submit(JobRequest::new(serde_json::Value::Null))]);
}

#[tokio::test(start_paused = true)]
async fn fake_tracks_concurrent_calls() {
    let client = FakeStatusClient::new();
    client.push_status_after(Duration::from_secs(1), Ok(JobState::builder().build()));
    let id = JobId::new("job-1");

    let (a, b) = tokio::join!(client.fetch_status(&id), client.fetch_status(&id));

    assert!(a.is_ok() && b.is_ok());
    assert_eq!(client.max_in_flight(), 2);
}
