// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use trapd_core::FakeClock;

use super::*;

fn config() -> StormGuardConfig {
    StormGuardConfig {
        window_seconds: 30,
        threshold: 5,
        silence_period_seconds: 60,
    }
}

#[test]
fn first_five_admitted_sixth_silences_rest_dropped() {
    let clock = FakeClock::default();
    let mut guard = StormGuard::new(config(), clock.clone());
    let source = SourceId::new("1.2.3.4");

    let mut decisions = Vec::new();
    for _ in 0..10 {
        guard.tick(false);
        decisions.push(guard.decide(&source));
    }

    for d in &decisions[0..5] {
        assert_eq!(*d, StormDecision::Admit);
    }
    assert_eq!(decisions[5], StormDecision::Silenced { silence_seconds: 60 });
    for d in &decisions[6..10] {
        assert_eq!(*d, StormDecision::Dropped);
    }
}

#[test]
fn no_further_traps_accepted_until_silence_expires() {
    let clock = FakeClock::default();
    let mut guard = StormGuard::new(config(), clock.clone());
    let source = SourceId::new("1.2.3.4");

    for _ in 0..6 {
        guard.tick(false);
        guard.decide(&source);
    }

    // Still well inside the 60s silence window; window resets don't lift it.
    clock.advance(30);
    guard.tick(false);
    assert_eq!(guard.decide(&source), StormDecision::Dropped);

    // Past the silence period and a window boundary: admission resumes.
    clock.advance(31);
    guard.tick(false);
    assert_eq!(guard.decide(&source), StormDecision::Admit);
}

#[test]
fn threshold_zero_or_negative_disables_protection() {
    let clock = FakeClock::default();
    let mut guard = StormGuard::new(
        StormGuardConfig {
            window_seconds: 10,
            threshold: 0,
            silence_period_seconds: 60,
        },
        clock,
    );
    let source = SourceId::new("10.0.0.1");
    for _ in 0..100 {
        assert_eq!(guard.decide(&source), StormDecision::Admit);
    }
}

#[test]
fn window_reset_clears_counts_for_unrelated_sources_independently() {
    let clock = FakeClock::default();
    let mut guard = StormGuard::new(config(), clock.clone());
    let a = SourceId::new("a");
    let b = SourceId::new("b");

    for _ in 0..5 {
        guard.decide(&a);
    }
    assert_eq!(guard.decide(&b), StormDecision::Admit);

    clock.advance(31);
    guard.tick(false);
    // Window reset: a's count starts fresh, so it is admitted again.
    assert_eq!(guard.decide(&a), StormDecision::Admit);
}

#[test]
fn lock_mode_forces_reset_every_tick() {
    let clock = FakeClock::default();
    let mut guard = StormGuard::new(config(), clock);
    let source = SourceId::new("a");

    for _ in 0..20 {
        guard.tick(true);
        assert_eq!(guard.decide(&source), StormDecision::Admit);
    }
}
