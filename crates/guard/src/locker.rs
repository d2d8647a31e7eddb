// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashSet;

use parking_lot::Mutex;
use tracing::debug;

use trapd_core::SourceId;

/// Optional per-source serialization: at most one worker processes a given
/// source's traps at a time. When `lock_mode` is off, every `acquire`
/// succeeds and `release` is a no-op.
pub struct SourceLocker {
    lock_mode: bool,
    held: Mutex<HashSet<SourceId>>,
}

impl SourceLocker {
    pub fn new(lock_mode: bool) -> Self {
        Self {
            lock_mode,
            held: Mutex::new(HashSet::new()),
        }
    }

    pub fn lock_mode(&self) -> bool {
        self.lock_mode
    }

    /// Attempts to take exclusive ownership of `source`. Returns `true`
    /// ("granted") if ownership was acquired, `false` ("refused") if another
    /// worker already holds it — the caller must treat a refusal as "defer
    /// to the carry-over buffer", not as an error.
    pub fn acquire(&self, source: &SourceId) -> bool {
        if !self.lock_mode {
            return true;
        }
        let granted = self.held.lock().insert(source.clone());
        if !granted {
            debug!(source = %source, "source already locked, deferring");
        }
        granted
    }

    pub fn release(&self, source: &SourceId) {
        if !self.lock_mode {
            return;
        }
        self.held.lock().remove(source);
    }
}

#[cfg(test)]
#[path = "locker_tests.rs"]
mod tests;
