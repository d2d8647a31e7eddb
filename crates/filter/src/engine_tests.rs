// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::source::{FilterGroup, StaticFilterSource};

use super::*;

fn two_groups() -> StaticFilterSource {
    StaticFilterSource::new(vec![
        FilterGroup {
            id: 1,
            patterns: vec!["foo".to_string(), "bar".to_string()],
        },
        FilterGroup {
            id: 2,
            patterns: vec!["baz".to_string()],
        },
    ])
}

#[test]
fn matches_via_second_group_when_only_its_pattern_is_present() {
    let engine = FilterEngine::new(&two_groups());
    assert!(engine.matches("trap tail contains foo baz here"));
}

#[test]
fn foo_alone_does_not_match_either_group() {
    let engine = FilterEngine::new(&two_groups());
    assert!(!engine.matches("just foo and nothing else"));
}

#[test]
fn matches_via_first_group_when_both_its_patterns_are_present() {
    let engine = FilterEngine::new(&two_groups());
    assert!(engine.matches("foo bar x"));
}

#[test]
fn matching_is_case_insensitive() {
    let engine = FilterEngine::new(&two_groups());
    assert!(engine.matches("FOO BAR"));
}

#[test]
fn no_filter_source_matches_nothing() {
    let engine = FilterEngine::new(&crate::source::NoFilterSource);
    assert!(!engine.matches("anything at all"));
}

#[test]
fn invalid_pattern_fails_closed_without_panicking() {
    let source = StaticFilterSource::new(vec![FilterGroup {
        id: 1,
        patterns: vec!["(unclosed".to_string()],
    }]);
    let engine = FilterEngine::new(&source);
    assert!(!engine.matches("anything"));
}
