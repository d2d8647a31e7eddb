// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

/// Fixed mapping from a varbind's textual type tag to the short-form letter
/// the downstream forwarder expects.
const TAGS: &[(&str, char)] = &[
    ("INTEGER", 'i'),
    ("UNSIGNED", 'u'),
    ("COUNTER32", 'c'),
    ("STRING", 's'),
    ("HEX STRING", 'x'),
    ("DECIMAL STRING", 'd'),
    ("NULLOBJ", 'n'),
    ("OBJID", 'o'),
    ("TIMETICKS", 't'),
    ("IPADDRESS", 'a'),
    ("BITS", 'b'),
];

/// One `(oid, type, value)` triple translated to the downstream short form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Varbind {
    pub oid: String,
    pub letter: char,
    pub value: String,
}

/// Scans a tab-separated varbind payload for `oid = TYPE: value` triples.
/// Fields that don't match a known type tag are skipped rather than
/// rejecting the whole payload.
pub fn translate_varbinds(payload: &str) -> Vec<Varbind> {
    payload.split('\t').filter_map(parse_one).collect()
}

fn parse_one(field: &str) -> Option<Varbind> {
    let eq = field.find('=')?;
    let oid = field[..eq].trim().to_string();
    let rest = field[eq + 1..].trim_start();
    let colon = rest.find(':')?;
    let type_tag = rest[..colon].trim();
    let mut value = rest[colon + 1..].trim().to_string();

    let letter = TAGS.iter().find(|(tag, _)| *tag == type_tag).map(|(_, l)| *l)?;
    if letter == 'i' {
        value.retain(|c| c.is_ascii_digit());
    }

    Some(Varbind { oid, letter, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeticks_varbind_translates_to_letter_t() {
        let varbinds = translate_varbinds(".1.3.6.1.2.1.1.3.0 = TIMETICKS: 12345");
        assert_eq!(
            varbinds,
            vec![Varbind {
                oid: ".1.3.6.1.2.1.1.3.0".to_string(),
                letter: 't',
                value: "12345".to_string(),
            }]
        );
    }

    #[test]
    fn integer_value_has_non_digits_stripped() {
        let varbinds = translate_varbinds(".1.2.3 = INTEGER: -42 (negativeNumber)");
        assert_eq!(varbinds[0].letter, 'i');
        assert_eq!(varbinds[0].value, "42");
    }

    #[test]
    fn multiple_tab_separated_varbinds_are_all_translated() {
        let varbinds =
            translate_varbinds(".1.1 = STRING: hello\t.1.2 = COUNTER32: 7\t.1.3 = IPADDRESS: 10.0.0.1");
        assert_eq!(varbinds.len(), 3);
        assert_eq!(varbinds[0].letter, 's');
        assert_eq!(varbinds[1].letter, 'c');
        assert_eq!(varbinds[2].letter, 'a');
    }

    #[test]
    fn unrecognized_type_tag_is_skipped() {
        let varbinds = translate_varbinds(".1.1 = WEIRDTYPE: whatever");
        assert!(varbinds.is_empty());
    }

    #[test]
    fn hex_string_is_distinguished_from_string() {
        let varbinds = translate_varbinds(".1.1 = HEX STRING: AB CD");
        assert_eq!(varbinds[0].letter, 'x');
    }
}
