// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Time abstraction shared by every component that needs wall-clock or
//! monotonic time: `StormGuard` window math, `SilenceEntry` expiry, and the
//! tailer's incompleteness wait all depend on this rather than calling
//! `std::time` directly, so they can be driven deterministically in tests.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Source of wall-clock and monotonic time.
pub trait Clock: Clone + Send + Sync + 'static {
    /// Current wall-clock time as unix seconds.
    fn now(&self) -> i64;

    /// Current monotonic instant, used for measuring elapsed durations
    /// (e.g. the tailer's bounded incompleteness wait).
    fn instant(&self) -> Instant;
}

/// Production clock backed by the OS.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }
}

/// Deterministic clock for tests: `now()` is set explicitly and never
/// advances on its own.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Clone)]
pub struct FakeClock {
    now: std::sync::Arc<std::sync::atomic::AtomicI64>,
    epoch: Instant,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeClock {
    pub fn new(start_unix: i64) -> Self {
        Self {
            now: std::sync::Arc::new(std::sync::atomic::AtomicI64::new(start_unix)),
            epoch: Instant::now(),
        }
    }

    /// Advance the fake clock by `secs` seconds.
    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn set(&self, unix: i64) {
        self.now.store(unix, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Default for FakeClock {
    fn default() -> Self {
        Self::new(1_700_000_000)
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Clock for FakeClock {
    fn now(&self) -> i64 {
        self.now.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn instant(&self) -> Instant {
        self.epoch
    }
}
