// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

/// Strips transport prefix, destination tail, and bracket/port decoration
/// from a raw source-address field, leaving the bare address or hostname.
///
/// Handles forms such as:
/// - `UDP: [192.0.2.5]:-1234 -> [198.51.100.1]:162` -> `192.0.2.5`
/// - `TCP: 192.0.2.5` -> `192.0.2.5`
/// - `192.0.2.5:162` -> `192.0.2.5`
pub fn normalize_source(raw: &str) -> String {
    let mut s = raw.trim();

    for prefix in ["TCP:", "UDP:"] {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = rest.trim_start();
            break;
        }
    }

    if let Some(idx) = s.find("->") {
        s = s[..idx].trim();
    }

    if let Some(rest) = s.strip_prefix('[') {
        if let Some(end) = rest.find(']') {
            return rest[..end].to_string();
        }
    }

    if let Some(idx) = s.rfind(':') {
        let (host, port) = s.split_at(idx);
        let port = &port[1..];
        let looks_like_port = !port.is_empty() && port.trim_start_matches('-').chars().all(|c| c.is_ascii_digit());
        if looks_like_port {
            return host.trim().to_string();
        }
    }

    s.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_transport_prefix_brackets_and_destination_tail() {
        assert_eq!(
            normalize_source("UDP: [192.0.2.5]:-1234 -> [198.51.100.1]:162"),
            "192.0.2.5"
        );
    }

    #[test]
    fn strips_tcp_prefix_without_brackets() {
        assert_eq!(normalize_source("TCP: 192.0.2.5"), "192.0.2.5");
    }

    #[test]
    fn strips_trailing_port_without_brackets() {
        assert_eq!(normalize_source("192.0.2.5:162"), "192.0.2.5");
    }

    #[test]
    fn leaves_bare_hostname_untouched() {
        assert_eq!(normalize_source("switch-core-1"), "switch-core-1");
    }
}
