// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP implementation of [`StatusClient`].
//!
//! - `POST {base}/jobs` with the request payload as the JSON body
//! - `GET {base}/jobs/{id}`
//!
//! Both use bearer-token authentication.

use super::{ClientError, StatusClient};
use async_trait::async_trait;
use pt_core::{JobHandle, JobId, JobRequest, JobState};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::Instrument;

/// Longest error body excerpt carried into a [`ClientError`]
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl HttpClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), token: None, timeout: Duration::from_secs(30) }
    }

    pt_core::setters! {
        set { timeout: Duration }
        option { token: String }
    }
}

/// Errors building an [`HttpStatusClient`].
#[derive(Debug, thiserror::Error)]
pub enum HttpClientError {
    #[error("invalid API URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

pub struct HttpStatusClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpStatusClient {
    pub fn new(config: HttpClientConfig) -> Result<Self, HttpClientError> {
        let invalid = |reason: String| HttpClientError::InvalidUrl {
            url: config.base_url.clone(),
            reason,
        };
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| invalid(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("not a base URL".to_string()));
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, base_url, token: config.token.filter(|t| !t.is_empty()) })
    }

    /// `{base}/jobs`, or `{base}/jobs/{id}` with the id as one encoded segment.
    fn endpoint(&self, job_id: Option<&JobId>) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so segments are always available
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("jobs");
            if let Some(id) = job_id {
                segments.push(id);
            }
        }
        url
    }

    fn jobs_url(&self) -> Url {
        self.endpoint(None)
    }

    fn job_url(&self, job_id: &JobId) -> Url {
        self.endpoint(Some(job_id))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| ClientError::Authentication("no API token configured".into()))?;

        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ClientError::request(transport_message(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        response.json::<T>().await.map_err(|e| ClientError::Request {
            status: Some(status.as_u16()),
            message: format!("invalid response body: {e}"),
        })
    }
}

#[async_trait]
impl StatusClient for HttpStatusClient {
    async fn submit(&self, request: &JobRequest) -> Result<JobHandle, ClientError> {
        let span = tracing::info_span!("client.submit", url = %self.jobs_url());
        async {
            let start = Instant::now();
            let result: Result<JobHandle, ClientError> =
                self.send(self.client.post(self.jobs_url()).json(request.payload())).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(handle) => tracing::info!(job_id = %handle.id, elapsed_ms, "job submitted"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "submit failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn fetch_status(&self, job_id: &JobId) -> Result<JobState, ClientError> {
        let span = tracing::debug_span!("client.fetch_status", %job_id);
        async {
            let start = Instant::now();
            let result: Result<JobState, ClientError> =
                self.send(self.client.get(self.job_url(job_id))).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(state) => tracing::debug!(status = %state.status, elapsed_ms, "fetched status"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "status fetch failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

fn transport_message(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else {
        e.to_string()
    }
}

/// Map a non-2xx response to the error taxonomy.
fn status_error(status: StatusCode, body: &str) -> ClientError {
    let excerpt = pt_core::short(body.trim(), MAX_ERROR_BODY);
    let detail = if excerpt.is_empty() {
        status.to_string()
    } else {
        format!("{status}: {excerpt}")
    };
    match status {
        StatusCode::UNAUTHORIZED => ClientError::Authentication(detail),
        StatusCode::FORBIDDEN => ClientError::Authorization(detail),
        _ => ClientError::Request { status: Some(status.as_u16()), message: detail },
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
