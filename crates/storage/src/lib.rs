// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Relational persistence for admitted traps, plus the fire-and-forget
//! hand-off to the alert-evaluation collaborator.

mod alert;
mod persister;
mod row;
mod sqlite;
mod store;

#[cfg(any(test, feature = "test-support"))]
mod fakes;

pub use alert::AlertEvaluator;
pub use persister::Persister;
pub use row::TrapRow;
pub use sqlite::SqliteTrapStore;
pub use store::{StoreError, TrapStore};

#[cfg(any(test, feature = "test-support"))]
pub use fakes::{FakeAlertEvaluator, FakeTrapStore, NoopAlertEvaluator};
