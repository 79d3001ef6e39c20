// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted control plane for tests.
//!
//! Responses are consumed in order; once a script runs dry the last
//! response repeats, like a control plane that keeps reporting the same
//! state. Each response can carry a delay so tests running on paused tokio
//! time can hold a call outstanding across poll ticks.

use super::{ClientError, StatusClient};
use async_trait::async_trait;
use parking_lot::Mutex;
use pt_core::{JobHandle, JobId, JobRequest, JobState};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Recorded client call
#[derive(Debug, Clone, PartialEq)]
pub enum ClientCall {
    Submit(JobRequest),
    FetchStatus(JobId),
}

#[derive(Clone)]
struct Scripted<T> {
    delay: Duration,
    result: Result<T, ClientError>,
}

struct Script<T> {
    queue: VecDeque<Scripted<T>>,
    last: Option<Scripted<T>>,
}

impl<T: Clone> Script<T> {
    fn new() -> Self {
        Self { queue: VecDeque::new(), last: None }
    }

    fn next(&mut self) -> Option<Scripted<T>> {
        if let Some(entry) = self.queue.pop_front() {
            self.last = Some(entry.clone());
            return Some(entry);
        }
        self.last.clone()
    }
}

struct FakeClientState {
    submits: Script<JobHandle>,
    statuses: Script<JobState>,
    calls: Vec<ClientCall>,
    in_flight: usize,
    max_in_flight: usize,
}

/// Fake status client for testing
#[derive(Clone)]
pub struct FakeStatusClient {
    inner: Arc<Mutex<FakeClientState>>,
}

impl Default for FakeStatusClient {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeClientState {
                submits: Script::new(),
                statuses: Script::new(),
                calls: Vec::new(),
                in_flight: 0,
                max_in_flight: 0,
            })),
        }
    }
}

impl FakeStatusClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_submit(&self, result: Result<JobHandle, ClientError>) -> &Self {
        self.inner.lock().submits.queue.push_back(Scripted { delay: Duration::ZERO, result });
        self
    }

    pub fn push_status(&self, result: Result<JobState, ClientError>) -> &Self {
        self.push_status_after(Duration::ZERO, result)
    }

    /// Script a status response that arrives after `delay`.
    pub fn push_status_after(
        &self,
        delay: Duration,
        result: Result<JobState, ClientError>,
    ) -> &Self {
        self.inner.lock().statuses.queue.push_back(Scripted { delay, result });
        self
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ClientCall> {
        self.inner.lock().calls.clone()
    }

    pub fn submit_count(&self) -> usize {
        self.inner.lock().calls.iter().filter(|c| matches!(c, ClientCall::Submit(_))).count()
    }

    pub fn fetch_count(&self) -> usize {
        self.inner.lock().calls.iter().filter(|c| matches!(c, ClientCall::FetchStatus(_))).count()
    }

    /// Highest number of calls that were outstanding at the same time
    pub fn max_in_flight(&self) -> usize {
        self.inner.lock().max_in_flight
    }

    async fn run<T: Clone>(
        &self,
        call: ClientCall,
        pick: impl FnOnce(&mut FakeClientState) -> Option<Scripted<T>>,
    ) -> Result<T, ClientError> {
        let scripted = {
            let mut state = self.inner.lock();
            state.calls.push(call);
            state.in_flight += 1;
            state.max_in_flight = state.max_in_flight.max(state.in_flight);
            pick(&mut state)
        };
        let _guard = InFlightGuard(Arc::clone(&self.inner));

        let Some(scripted) = scripted else {
            return Err(ClientError::request("no scripted response"));
        };
        if !scripted.delay.is_zero() {
            tokio::time::sleep(scripted.delay).await;
        }
        scripted.result
    }
}

/// Decrements the in-flight count even when the call future is dropped.
struct InFlightGuard(Arc<Mutex<FakeClientState>>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.lock().in_flight -= 1;
    }
}

#[async_trait]
impl StatusClient for FakeStatusClient {
    async fn submit(&self, request: &JobRequest) -> Result<JobHandle, ClientError> {
        self.run(ClientCall::Submit(request.clone()), |s| s.submits.next()).await
    }

    async fn fetch_status(&self, job_id: &JobId) -> Result<JobState, ClientError> {
        self.run(ClientCall::FetchStatus(job_id.clone()), |s| s.statuses.next()).await
    }
}
