// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Durable, crash-safe tailing of externally-written SNMP trap log files.
//!
//! Handles rotation/truncation detection, multi-line record reassembly, and
//! index-file checkpointing so a restarted daemon resumes at (approximately)
//! the line it left off at, with at-least-once semantics.

mod tailer;

pub use tailer::{LogTailer, TailerError};
