// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! trapd-core: shared data model for the SNMP trap ingestion pipeline.

pub mod clock;
pub mod cursor;
pub mod id;
pub mod source;
pub mod trap;

pub use clock::{Clock, SystemClock};
pub use cursor::CursorPosition;
pub use id::ShortId;
pub use source::SourceId;
pub use trap::{Trap, TrapVersion};

#[cfg(any(test, feature = "test-support"))]
pub use clock::FakeClock;
