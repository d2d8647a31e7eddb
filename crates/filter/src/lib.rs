// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Regex-based drop filters: a trap matching a configured group is silently
//! dropped from the pipeline before it reaches storage or forwarding.

mod engine;
mod source;

pub use engine::FilterEngine;
pub use source::{FilterGroup, FilterSource, NoFilterSource, StaticFilterSource};
