// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use pt_core::{JobHandle, JobId, JobRequest};
use std::sync::Arc;

fn job_ref(id: &str) -> PersistedJobRef {
    let handle = JobHandle { id: JobId::new(id), initial_status: String::new() };
    PersistedJobRef::new(&handle, JobRequest::new(serde_json::Value::Null), 0)
}

#[test]
fn save_load_clear() {
    let store = MemoryJobStore::new();
    assert!(store.load().unwrap().is_none());

    store.save(&job_ref("job-1")).unwrap();
    store.save(&job_ref("job-2")).unwrap();
    assert_eq!(store.load().unwrap().unwrap().job_id, "job-2");

    store.clear().unwrap();
    store.clear().unwrap();
    assert!(store.load().unwrap().is_none());
}

#[test]
fn arc_store_shares_slot() {
    let store = Arc::new(MemoryJobStore::with_ref(job_ref("job-1")));
    let shared = Arc::clone(&store);

    shared.clear().unwrap();

    assert!(store.load().unwrap().is_none());
}
