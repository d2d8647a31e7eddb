// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;
use tracing::warn;

use trapd_core::{Clock, SourceId, Trap, TrapVersion};

use crate::normalize::normalize_source;

const FIELD_DELIM: &str = "[**]";

/// Standard SNMPv2 trap-OID prefix; the trailing digit selects `generic_type`.
const GENERIC_TRAP_PREFIX: &str = ".1.3.6.1.6.3.1.1.5.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line does not begin with a recognized version tag")]
    UnknownVersion,
    #[error("v1 record has too few [**] fields: {0}")]
    TruncatedV1(usize),
    #[error("v2 record has too few [**] fields: {0}")]
    TruncatedV2(usize),
    #[error("v2 record's data field has too few tab fields: {0}")]
    TruncatedV2Data(usize),
    #[error("oid is empty after falling back to type_desc")]
    MissingOid,
}

/// Turns one logical trap-log line into a `Trap`.
///
/// `use_pdu_address` mirrors the `snmp_pdu_address` configuration flag: when
/// set, v1 source fields are normalized the same way v2 ones always are.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrapParser {
    use_pdu_address: bool,
}

impl TrapParser {
    pub fn new(use_pdu_address: bool) -> Self {
        Self { use_pdu_address }
    }

    pub fn parse(&self, line: &str, clock: &impl Clock) -> Result<Trap, ParseError> {
        let fields: Vec<&str> = line.split(FIELD_DELIM).collect();
        match fields.first().copied() {
            Some("SNMPv1") => self.parse_v1(&fields, clock),
            Some("SNMPv2") => self.parse_v2(&fields, clock),
            _ => Err(ParseError::UnknownVersion),
        }
    }

    fn parse_v1(&self, fields: &[&str], clock: &impl Clock) -> Result<Trap, ParseError> {
        if fields.len() < 9 {
            return Err(ParseError::TruncatedV1(fields.len()));
        }

        let date = fields[1];
        let time = fields[2];
        let raw_source = fields[3];
        let mut oid = fields[4].to_string();
        let generic_type = fields[5].trim().parse::<i32>().unwrap_or(0);
        let type_desc = fields[6].to_string();
        let value = sanitize(fields[7]);
        let data = fields[8..].join(FIELD_DELIM);

        if oid.is_empty() || oid == "." {
            oid = type_desc.clone();
        }
        if oid.is_empty() {
            warn!("dropping v1 trap with no usable oid");
            return Err(ParseError::MissingOid);
        }

        let source = if self.use_pdu_address {
            normalize_source(raw_source)
        } else {
            raw_source.to_string()
        };

        let received_at = format!("{date} {time}");
        let received_at_unix = parse_timestamp(&received_at).unwrap_or_else(|| clock.now());

        Ok(Trap {
            version: TrapVersion::V1,
            received_at,
            received_at_unix,
            source: SourceId::new(source),
            oid,
            generic_type,
            value,
            type_desc,
            custom_payload: data.clone(),
            raw_tail: data,
        })
    }

    fn parse_v2(&self, fields: &[&str], clock: &impl Clock) -> Result<Trap, ParseError> {
        if fields.len() < 5 {
            return Err(ParseError::TruncatedV2(fields.len()));
        }

        let date = fields[1];
        let time = fields[2];
        let raw_source = fields[3];
        let data = fields[4..].join(FIELD_DELIM);

        let tab_fields: Vec<&str> = data.split('\t').collect();
        if tab_fields.len() < 2 {
            return Err(ParseError::TruncatedV2Data(tab_fields.len()));
        }

        let oid_field = tab_fields[1];
        let oid = match oid_field.find(" = OID: ") {
            Some(idx) => oid_field[idx + " = OID: ".len()..].to_string(),
            None => oid_field.to_string(),
        };
        if oid.is_empty() {
            warn!("dropping v2 trap with no usable oid");
            return Err(ParseError::MissingOid);
        }

        let custom_payload = tab_fields[2..].join("\t");
        let generic_type = derive_generic_type(&oid);
        let source = normalize_source(raw_source);

        let received_at = format!("{date} {time}");
        let received_at_unix = parse_timestamp(&received_at).unwrap_or_else(|| clock.now());

        Ok(Trap {
            version: TrapVersion::V2,
            received_at,
            received_at_unix,
            source: SourceId::new(source),
            oid,
            generic_type,
            value: String::new(),
            type_desc: String::new(),
            custom_payload,
            raw_tail: data,
        })
    }
}

/// `.1.3.6.1.6.3.1.1.5.N` for `N` in `1..=5` maps to `generic_type = N - 1`;
/// anything else (including a non-matching OID) maps to `6`.
fn derive_generic_type(oid: &str) -> i32 {
    oid.strip_prefix(GENERIC_TRAP_PREFIX)
        .and_then(|suffix| suffix.parse::<i32>().ok())
        .filter(|n| (1..=5).contains(n))
        .map(|n| n - 1)
        .unwrap_or(6)
}

fn sanitize(value: &str) -> String {
    value.chars().filter(|c| !c.is_control()).collect()
}

fn parse_timestamp(received_at: &str) -> Option<i64> {
    let (date, time) = received_at.split_once(' ')?;
    let (y, m, d) = {
        let mut parts = date.split('-');
        (
            parts.next()?.parse::<i64>().ok()?,
            parts.next()?.parse::<i64>().ok()?,
            parts.next()?.parse::<i64>().ok()?,
        )
    };
    let (hh, mm, ss) = {
        let mut parts = time.split(':');
        (
            parts.next()?.parse::<i64>().ok()?,
            parts.next()?.parse::<i64>().ok()?,
            parts.next()?.parse::<i64>().ok()?,
        )
    };
    if !(1..=12).contains(&m) || !(1..=31).contains(&d) {
        return None;
    }
    Some(days_from_civil(y, m, d) * 86_400 + hh * 3600 + mm * 60 + ss)
}

/// Howard Hinnant's civil-to-days algorithm; avoids pulling in a full date
/// crate for a single timestamp conversion.
fn days_from_civil(y: i64, m: i64, d: i64) -> i64 {
    let y = if m <= 2 { y - 1 } else { y };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let mp = (m + 9) % 12;
    let doy = (153 * mp + 2) / 5 + d - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
