// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Canonicalized trap source identifier.

crate::define_id! {
    /// A trap's origin, canonicalized to a bare address or hostname
    /// (see `trapd_parser::normalize_source`). Used as the key for
    /// `StormGuard` counters, `SilenceEntry`s, and the `SourceLocker` lock set.
    pub struct SourceId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_id_compares_as_str() {
        let a = SourceId::new("10.0.0.1");
        assert_eq!(a, "10.0.0.1");
    }
}
