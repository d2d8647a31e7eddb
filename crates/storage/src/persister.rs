// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use tracing::warn;
use trapd_core::{Clock, Trap};

use crate::alert::AlertEvaluator;
use crate::row::TrapRow;
use crate::store::{StoreError, TrapStore};

/// Sole writer of admitted traps: inserts the row, then hands the result to
/// the alert-evaluation collaborator. Evaluation failures are logged and
/// otherwise ignored — they must not undo a successful insert.
pub struct Persister<C: Clock> {
    store: Arc<dyn TrapStore>,
    evaluator: Arc<dyn AlertEvaluator>,
    clock: C,
}

impl<C: Clock> Persister<C> {
    pub fn new(store: Arc<dyn TrapStore>, evaluator: Arc<dyn AlertEvaluator>, clock: C) -> Self {
        Self {
            store,
            evaluator,
            clock,
        }
    }

    pub async fn persist(&self, trap: &Trap) -> Result<String, StoreError> {
        let row = TrapRow {
            timestamp: trap.received_at.clone(),
            source: trap.source.as_str().to_string(),
            oid: trap.oid.clone(),
            generic_type: trap.generic_type,
            value: trap.value.clone(),
            custom_oid: trap.custom_payload.clone(),
            custom_value: String::new(),
            custom_type: String::new(),
            unix_time: self.clock.now(),
        };

        let id = self.store.insert(row).await?;

        if let Err(err) = self
            .evaluator
            .evaluate(
                &id,
                trap.source.as_str(),
                &trap.oid,
                trap.generic_type,
                &trap.value,
                &trap.custom_payload,
            )
            .await
        {
            warn!(id = %id, error = %err, "alert evaluation hand-off failed");
        }

        Ok(id)
    }
}

#[cfg(test)]
#[path = "persister_tests.rs"]
mod tests;
