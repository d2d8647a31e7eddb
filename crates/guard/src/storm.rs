// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashMap;

use tracing::{debug, warn};

use trapd_core::{Clock, SourceId};

/// `threshold <= 0` disables storm protection entirely (every trap is
/// admitted). `silence_period_seconds <= 0` falls back to `window_seconds`.
#[derive(Debug, Clone, Copy)]
pub struct StormGuardConfig {
    pub window_seconds: i64,
    pub threshold: i64,
    pub silence_period_seconds: i64,
}

#[derive(Debug, Default)]
struct SourceStat {
    count: i64,
    event_emitted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StormDecision {
    Admit,
    Dropped,
    /// Returned exactly once per silencing transition; the caller is
    /// responsible for emitting the single user-visible system event.
    Silenced { silence_seconds: i64 },
}

/// Process-wide sliding-window rate limiter, one instance per daemon.
pub struct StormGuard<C: Clock> {
    config: StormGuardConfig,
    clock: C,
    storm_ref: i64,
    stats: HashMap<SourceId, SourceStat>,
    silence_until: HashMap<SourceId, i64>,
}

impl<C: Clock> StormGuard<C> {
    pub fn new(config: StormGuardConfig, clock: C) -> Self {
        let storm_ref = clock.now();
        Self {
            config,
            clock,
            storm_ref,
            stats: HashMap::new(),
            silence_until: HashMap::new(),
        }
    }

    /// Call once per dispatcher tick, before `decide`. Resets the window
    /// (clearing all counts) if the window has elapsed or lock mode is on.
    pub fn tick(&mut self, lock_mode: bool) {
        let now = self.clock.now();
        if lock_mode || now > self.storm_ref + self.config.window_seconds {
            self.storm_ref = now;
            self.stats.clear();
        }
    }

    /// Decide whether a trap from `source` should be admitted.
    pub fn decide(&mut self, source: &SourceId) -> StormDecision {
        let now = self.clock.now();

        if let Some(&until) = self.silence_until.get(source) {
            if now < until {
                return StormDecision::Dropped;
            }
            self.silence_until.remove(source);
            debug!(source = %source, "silence period elapsed, admitting source again");
        }

        let stat = self.stats.entry(source.clone()).or_default();
        stat.count += 1;

        if self.config.threshold > 0 && stat.count > self.config.threshold {
            if !stat.event_emitted {
                let silence_seconds = if self.config.silence_period_seconds > 0 {
                    self.config.silence_period_seconds
                } else {
                    self.config.window_seconds
                };
                self.silence_until.insert(source.clone(), now + silence_seconds);
                stat.event_emitted = true;
                warn!(source = %source, count = stat.count, silence_seconds, "source exceeded storm threshold, silencing");
                return StormDecision::Silenced { silence_seconds };
            }
            return StormDecision::Dropped;
        }

        StormDecision::Admit
    }
}

#[cfg(test)]
#[path = "storm_tests.rs"]
mod tests;
