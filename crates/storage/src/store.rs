// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use thiserror::Error;

use crate::row::TrapRow;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("blocking task panicked: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// The sole writer of trap rows. Inserts are independent — no multi-row
/// transactions are required.
#[async_trait]
pub trait TrapStore: Send + Sync {
    /// Inserts one row and returns its generated id.
    async fn insert(&self, row: TrapRow) -> Result<String, StoreError>;
}
