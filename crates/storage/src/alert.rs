// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;

use crate::store::StoreError;

/// Fire-and-forget hand-off to the external alert-evaluation engine, invoked
/// once per successfully persisted trap.
#[async_trait]
pub trait AlertEvaluator: Send + Sync {
    #[allow(clippy::too_many_arguments)]
    async fn evaluate(
        &self,
        id: &str,
        source: &str,
        oid: &str,
        generic_type: i32,
        value: &str,
        custom_payload: &str,
    ) -> Result<(), StoreError>;
}
