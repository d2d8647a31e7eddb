// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use regex::RegexBuilder;
use tracing::warn;

use crate::source::FilterSource;

struct CompiledGroup {
    id: i64,
    patterns: Vec<Option<regex::Regex>>,
}

/// Compiled snapshot of the configured filter groups. Rebuild (via `new`)
/// whenever the upstream `FilterSource` changes.
pub struct FilterEngine {
    groups: Vec<CompiledGroup>,
}

impl FilterEngine {
    pub fn new(source: &dyn FilterSource) -> Self {
        let groups = source
            .groups()
            .into_iter()
            .map(|g| {
                let patterns = g
                    .patterns
                    .iter()
                    .map(|p| match RegexBuilder::new(p).case_insensitive(true).build() {
                        Ok(re) => Some(re),
                        Err(err) => {
                            warn!(group = g.id, pattern = %p, error = %err, "filter pattern failed to compile, treating as non-matching");
                            None
                        }
                    })
                    .collect();
                CompiledGroup { id: g.id, patterns }
            })
            .collect();
        Self { groups }
    }

    /// A trap matches iff at least one group's patterns all match `raw_tail`.
    /// A pattern that failed to compile never matches (fail-closed), and a
    /// panic from a pathological regex never propagates past this call.
    pub fn matches(&self, raw_tail: &str) -> bool {
        self.groups.iter().any(|group| self.group_matches(group, raw_tail))
    }

    fn group_matches(&self, group: &CompiledGroup, raw_tail: &str) -> bool {
        group.patterns.iter().all(|pattern| match pattern {
            Some(re) => std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| re.is_match(raw_tail))).unwrap_or(false),
            None => false,
        })
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
