// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::store::{JobStore, StoreError};
use parking_lot::Mutex;
use pt_core::PersistedJobRef;

/// In-process job store. Survives tracker instances, not process restarts.
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    slot: Mutex<Option<PersistedJobRef>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `job_ref`, as if left behind by an earlier run.
    pub fn with_ref(job_ref: PersistedJobRef) -> Self {
        Self { slot: Mutex::new(Some(job_ref)) }
    }
}

impl JobStore for MemoryJobStore {
    fn save(&self, job_ref: &PersistedJobRef) -> Result<(), StoreError> {
        *self.slot.lock() = Some(job_ref.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<PersistedJobRef>, StoreError> {
        Ok(self.slot.lock().clone())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.slot.lock().take();
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
