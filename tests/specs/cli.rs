// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#[path = "cli/help.rs"]
mod help;
#[path = "cli/state.rs"]
mod state;
#[path = "cli/submit.rs"]
mod submit;
