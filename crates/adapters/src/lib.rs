// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for the control plane and desktop notifications

pub mod client;
pub mod notify;

pub use client::{
    ClientError, HttpClientConfig, HttpClientError, HttpStatusClient, StatusClient,
};
#[cfg(any(test, feature = "test-support"))]
pub use client::{ClientCall, FakeStatusClient};
#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeNotifyAdapter;
pub use notify::{DesktopNotifyAdapter, Notification, NotifyAdapter, NotifyError};
