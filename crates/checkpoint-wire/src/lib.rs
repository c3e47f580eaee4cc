// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! IPC protocol between the CLI and a running `checkpoint-watch` process.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload. Most of
//! the status dashboard (spec.md §6 `status`) is read straight off state
//! files and does not need this crate at all; this socket only exists to
//! answer the handful of questions only the live watcher process can
//! answer (which backend it selected, what's sitting in its debounce
//! queue right now).

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod query;
mod response;
mod wire;

pub use query::Query;
pub use response::{Response, WatcherStatusPayload};
pub use wire::{
    decode, encode, read_message, read_query, read_response, write_message, write_query, write_response,
    ProtocolError, DEFAULT_TIMEOUT, MAX_MESSAGE_SIZE,
};
