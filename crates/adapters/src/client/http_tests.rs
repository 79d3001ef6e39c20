// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use pt_core::MilestoneStatus;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> HttpStatusClient {
    HttpStatusClient::new(
        HttpClientConfig::new(server.uri()).token("secret").timeout(Duration::from_secs(5)),
    )
    .unwrap()
}

#[tokio::test]
async fn submit_posts_request_and_parses_handle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jobs"))
        .and(header("authorization", "Bearer secret"))
        .and(body_json(json!({"name": "edge", "nodes": 3})))
        .respond_with(
            ResponseTemplate::new(202)
                .set_body_json(json!({"jobId": "job-1", "status": "SUBMITTED"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request = JobRequest::new(json!({"name": "edge", "nodes": 3}));
    let handle = client(&server).submit(&request).await.unwrap();

    assert_eq!(handle.id, "job-1");
    assert_eq!(handle.initial_status, "SUBMITTED");
}

#[tokio::test]
async fn fetch_status_parses_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "job-1",
            "status": "RUNNING",
            "milestones": [{"id": "SPEC_SUBMITTED", "status": "COMPLETE"}],
            "conditions": null
        })))
        .mount(&server)
        .await;

    let state = client(&server).fetch_status(&JobId::new("job-1")).await.unwrap();

    assert_eq!(state.status, "RUNNING");
    assert_eq!(state.milestones[0].status, MilestoneStatus::Complete);
    assert!(state.conditions.is_empty());
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/job-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "job-1", "status": "RUNNING"})),
        )
        .mount(&server)
        .await;

    let client = HttpStatusClient::new(
        HttpClientConfig::new(format!("{}/", server.uri())).token("secret"),
    )
    .unwrap();
    assert!(client.fetch_status(&JobId::new("job-1")).await.is_ok());
}

#[yare::parameterized(
    unauthorized = { 401 },
    forbidden    = { 403 },
    not_found    = { 404 },
    unavailable  = { 503 },
)]
#[test_macro(tokio::test)]
async fn status_codes_map_to_error_taxonomy(code: u16) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/job-1"))
        .respond_with(ResponseTemplate::new(code).set_body_string("nope"))
        .mount(&server)
        .await;

    let err = client(&server).fetch_status(&JobId::new("job-1")).await.unwrap_err();

    match code {
        401 => assert!(matches!(err, ClientError::Authentication(_)), "got {err:?}"),
        403 => assert!(matches!(err, ClientError::Authorization(_)), "got {err:?}"),
        _ => assert!(err.is_transient(), "got {err:?}"),
    }
    assert!(err.to_string().contains("nope"));
}

#[tokio::test]
async fn fetch_status_accepts_body_without_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "SUCCEEDED",
            "milestones": [{"id": "SPEC_SUBMITTED", "status": "COMPLETE"}]
        })))
        .mount(&server)
        .await;

    let state = client(&server).fetch_status(&JobId::new("job-1")).await.unwrap();

    assert!(state.id.is_empty());
    assert!(state.is_terminal());
}

#[tokio::test]
async fn job_id_is_a_single_encoded_path_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/jobs/team%2Fjob%3F1%231"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "RUNNING"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpStatusClient::new(
        HttpClientConfig::new(format!("{}/api/", server.uri())).token("t"),
    )
    .unwrap();
    let state = client.fetch_status(&JobId::new("team/job?1#1")).await.unwrap();

    assert_eq!(state.status, "RUNNING");
}

#[yare::parameterized(
    not_a_url = { "control-plane" },
    no_base   = { "mailto:ops@example.com" },
)]
fn invalid_base_url_is_rejected(url: &str) {
    let err = HttpStatusClient::new(HttpClientConfig::new(url)).err().unwrap();
    assert!(matches!(err, HttpClientError::InvalidUrl { .. }), "got {err:?}");
}

#[tokio::test]
async fn missing_token_fails_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = HttpStatusClient::new(HttpClientConfig::new(server.uri())).unwrap();
    let err = client.submit(&JobRequest::new(json!({}))).await.unwrap_err();

    assert!(matches!(err, ClientError::Authentication(_)));
}

#[tokio::test]
async fn empty_token_counts_as_missing() {
    let client =
        HttpStatusClient::new(HttpClientConfig::new("http://127.0.0.1:9").token("")).unwrap();
    let err = client.fetch_status(&JobId::new("job-1")).await.unwrap_err();
    assert!(matches!(err, ClientError::Authentication(_)));
}

#[tokio::test]
async fn invalid_body_is_a_request_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client(&server).fetch_status(&JobId::new("job-1")).await.unwrap_err();
    assert!(matches!(err, ClientError::Request { status: Some(200), .. }), "got {err:?}");
}

#[tokio::test]
async fn connection_refused_is_transient() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client =
        HttpStatusClient::new(HttpClientConfig::new(format!("http://{addr}")).token("t")).unwrap();
    let err = client.fetch_status(&JobId::new("job-1")).await.unwrap_err();
    assert!(err.is_transient());
}

#[tokio::test]
async fn slow_server_times_out_as_transient() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "job-1", "status": "RUNNING"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = HttpStatusClient::new(
        HttpClientConfig::new(server.uri()).token("t").timeout(Duration::from_millis(100)),
    )
    .unwrap();
    let err = client.fetch_status(&JobId::new("job-1")).await.unwrap_err();
    assert_eq!(err, ClientError::request("request timed out"));
}

#[test]
fn long_error_bodies_are_truncated() {
    let body = "x".repeat(1_000);
    let err = status_error(StatusCode::BAD_GATEWAY, &body);
    assert!(err.to_string().len() < 300);
}
