// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted resume point for a tailed log file.

use serde::{Deserialize, Serialize};

/// The durable part of a `FileCursor`: how far into the log file has been
/// consumed. Everything else about a cursor (open file handle, read-ahead
/// buffer) is runtime-only state owned by `trapd_tailer::LogTailer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CursorPosition {
    /// 1-based count of logical lines consumed.
    pub last_line: u64,
    /// Byte offset consumed.
    pub last_size: u64,
}

impl CursorPosition {
    pub const ZERO: CursorPosition = CursorPosition {
        last_line: 0,
        last_size: 0,
    };

    /// Render as the index file's on-disk representation: `"<last_line> <last_size>"`.
    pub fn to_index_line(self) -> String {
        format!("{} {}", self.last_line, self.last_size)
    }

    /// Parse the index file's on-disk representation.
    ///
    /// Returns `None` on any malformed content; callers treat this the same
    /// as a missing index file (resume from zero — worst case is a replay).
    pub fn parse_index_line(s: &str) -> Option<CursorPosition> {
        let mut parts = s.trim().split_whitespace();
        let last_line = parts.next()?.parse().ok()?;
        let last_size = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(CursorPosition {
            last_line,
            last_size,
        })
    }
}
