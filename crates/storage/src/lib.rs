// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Durable storage for the single in-flight job reference

mod file;
mod memory;
mod store;

pub use file::{FileJobStore, CURRENT_STORE_VERSION, JOB_FILE_NAME};
pub use memory::MemoryJobStore;
pub use store::{JobStore, StoreError};
