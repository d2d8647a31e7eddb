// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use tokio::sync::oneshot;
use trapd_core::SourceId;

/// One admitted, lock-acquired trap line handed to a worker. `done` lets the
/// producer wait for this tick's whole batch without tearing down the pool
/// between ticks.
pub struct Task {
    pub source: SourceId,
    pub raw_line: String,
    pub done: oneshot::Sender<()>,
}
