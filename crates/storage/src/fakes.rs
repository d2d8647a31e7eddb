// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::alert::AlertEvaluator;
use crate::row::TrapRow;
use crate::store::{StoreError, TrapStore};

/// In-memory `TrapStore` for tests: records every row it was asked to
/// insert and hands out sequential ids.
#[derive(Default)]
pub struct FakeTrapStore {
    rows: Mutex<Vec<TrapRow>>,
    next_id: AtomicU64,
}

impl FakeTrapStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn rows(&self) -> Vec<TrapRow> {
        self.rows.lock().clone()
    }
}

#[async_trait]
impl TrapStore for FakeTrapStore {
    async fn insert(&self, row: TrapRow) -> Result<String, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().push(row);
        Ok(id.to_string())
    }
}

/// Accepts every evaluation request and discards it, for when alert
/// evaluation is disabled or irrelevant to a test.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAlertEvaluator;

#[async_trait]
impl AlertEvaluator for NoopAlertEvaluator {
    async fn evaluate(
        &self,
        _id: &str,
        _source: &str,
        _oid: &str,
        _generic_type: i32,
        _value: &str,
        _custom_payload: &str,
    ) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Records every evaluation request it receives, for assertions.
#[derive(Default)]
pub struct FakeAlertEvaluator {
    calls: Mutex<Vec<(String, String, String, i32, String, String)>>,
}

impl FakeAlertEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(String, String, String, i32, String, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl AlertEvaluator for FakeAlertEvaluator {
    async fn evaluate(
        &self,
        id: &str,
        source: &str,
        oid: &str,
        generic_type: i32,
        value: &str,
        custom_payload: &str,
    ) -> Result<(), StoreError> {
        self.calls.lock().push((
            id.to_string(),
            source.to_string(),
            oid.to_string(),
            generic_type,
            value.to_string(),
            custom_payload.to_string(),
        ));
        Ok(())
    }
}
