// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Trap` data model: an immutable, parsed SNMP trap record.

use serde::{Deserialize, Serialize};

use crate::source::SourceId;

/// Wire-format dialect the external trap daemon emitted this record in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrapVersion {
    V1,
    V2,
}

impl TrapVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            TrapVersion::V1 => "SNMPv1",
            TrapVersion::V2 => "SNMPv2",
        }
    }
}

/// A single parsed and normalized SNMP trap record.
///
/// Immutable after parse — `trapd_parser::TrapParser` is the only producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trap {
    pub version: TrapVersion,
    /// Bit-exact `"YYYY-MM-DD HH:MM:SS"` as originally written by the daemon.
    pub received_at: String,
    /// `received_at` parsed to unix seconds, for the storage row and for
    /// in-process comparisons. Falls back to ingestion time if unparseable.
    pub received_at_unix: i64,
    /// Canonicalized source address/hostname.
    pub source: SourceId,
    /// Dotted numeric OID: enterprise OID (v1) or `snmpTrapOID.0` value (v2).
    pub oid: String,
    /// 0..6; derived from the standard OID prefix for v2, read directly for v1.
    pub generic_type: i32,
    /// v1 only; empty for v2.
    pub value: String,
    /// v1 only; empty for v2.
    pub type_desc: String,
    /// Remaining delimited varbind payload, as a single string.
    pub custom_payload: String,
    /// The portion of the record matched against filter patterns.
    pub raw_tail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trap_version_as_str() {
        assert_eq!(TrapVersion::V1.as_str(), "SNMPv1");
        assert_eq!(TrapVersion::V2.as_str(), "SNMPv2");
    }
}
