// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use trapd_core::{Clock, CursorPosition};

/// Number of 1-second waits the tailer allows for a partially-written
/// logical line to complete before giving up and returning it as-is.
const MAX_WAIT_ITERATIONS: u32 = 10;
const WAIT_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum TailerError {
    #[error("failed to open log file {0}: {1}")]
    Open(PathBuf, #[source] std::io::Error),
    #[error("io error on {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
}

/// A logical line still being assembled: physical bytes read so far, and
/// whether a trailing newline has been observed (i.e. the write is complete).
struct Pending {
    text: String,
    complete: bool,
}

/// Per-file cursor over one externally-appended SNMP trap log.
///
/// Not `Clone`/`Send` by value — owns a live file handle for the process
/// lifetime (reopened only on truncation), per spec.
pub struct LogTailer<C: Clock> {
    log_path: PathBuf,
    index_path: PathBuf,
    file: BufReader<File>,
    position: CursorPosition,
    read_ahead: Option<Pending>,
    clock: C,
}

fn index_path_for(log_path: &Path) -> PathBuf {
    let mut s = log_path.as_os_str().to_owned();
    s.push(".index");
    PathBuf::from(s)
}

impl<C: Clock> LogTailer<C> {
    /// Open a log file, restoring its checkpoint from the index file (if
    /// any) by replaying `last_line` logical records via `next()`.
    ///
    /// A missing or unparseable index file is treated as `(0, 0)` — the
    /// worst case is replaying records already delivered before the crash.
    pub async fn open(log_path: impl Into<PathBuf>, clock: C) -> Result<Self, TailerError> {
        let log_path = log_path.into();
        let file = File::open(&log_path).map_err(|e| TailerError::Open(log_path.clone(), e))?;
        let index_path = index_path_for(&log_path);

        let mut tailer = Self {
            log_path,
            index_path,
            file: BufReader::new(file),
            position: CursorPosition::ZERO,
            read_ahead: None,
            clock,
        };

        if let Some(checkpoint) = tailer.read_index() {
            for _ in 0..checkpoint.last_line {
                if tailer.next().await?.is_none() {
                    break;
                }
            }
        }

        Ok(tailer)
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn position(&self) -> CursorPosition {
        self.position
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn read_index(&self) -> Option<CursorPosition> {
        let content = std::fs::read_to_string(&self.index_path).ok()?;
        CursorPosition::parse_index_line(&content)
    }

    /// Durably (but not fsync'd) persist the current checkpoint. Intended to
    /// be called by the caller after each successful `next()`; duplicate
    /// re-processing of the most recent record after a crash is acceptable.
    pub fn checkpoint(&self) -> Result<(), TailerError> {
        std::fs::write(&self.index_path, self.position.to_index_line())
            .map_err(|e| TailerError::Io(self.index_path.clone(), e))
    }

    /// Rotation/truncation check: call once per tick before draining.
    /// Returns `true` if a reset happened.
    pub fn check_rotation(&mut self) -> Result<bool, TailerError> {
        let size = std::fs::metadata(&self.log_path)
            .map(|m| m.len())
            .unwrap_or(0);
        if size >= self.position.last_size {
            return Ok(false);
        }

        warn!(log = %self.log_path.display(), "log truncation detected, resetting cursor");
        let _ = std::fs::remove_file(&self.index_path);
        self.position = CursorPosition::ZERO;
        self.read_ahead = None;
        let file =
            File::open(&self.log_path).map_err(|e| TailerError::Open(self.log_path.clone(), e))?;
        self.file = BufReader::new(file);
        Ok(true)
    }

    /// Read one physical line (up to and including `\n`, stripped).
    /// Returns `None` if no new bytes are currently available.
    fn read_physical_line(&mut self) -> Result<Option<(String, bool)>, TailerError> {
        let mut buf = String::new();
        let n = self
            .file
            .read_line(&mut buf)
            .map_err(|e| TailerError::Io(self.log_path.clone(), e))?;
        if n == 0 {
            return Ok(None);
        }
        let complete = buf.ends_with('\n');
        if complete {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        Ok(Some((buf, complete)))
    }

    /// Wait up to `MAX_WAIT_ITERATIONS * WAIT_INTERVAL` for `pending` to see
    /// its trailing newline, appending whatever new bytes arrive.
    async fn wait_for_completion(&mut self, pending: &mut Pending) -> Result<(), TailerError> {
        for _ in 0..MAX_WAIT_ITERATIONS {
            if pending.complete {
                break;
            }
            tokio::time::sleep(WAIT_INTERVAL).await;
            if let Some((more, complete)) = self.read_physical_line()? {
                pending.text.push_str(&more);
                pending.complete = complete;
            }
        }
        Ok(())
    }

    /// Read the next logical (possibly multi-line) trap record.
    ///
    /// Returns `(position, line)` on success, `None` if the file is
    /// exhausted for now. `position` reflects the cursor *after* consuming
    /// this record and is what `checkpoint()` will persist.
    pub async fn next(&mut self) -> Result<Option<(CursorPosition, String)>, TailerError> {
        let mut pending = match self.read_ahead.take() {
            Some(p) => p,
            None => match self.read_physical_line()? {
                Some((text, complete)) => Pending { text, complete },
                None => return Ok(None),
            },
        };

        if !pending.complete {
            self.wait_for_completion(&mut pending).await?;
        }

        if pending.complete {
            loop {
                match self.read_physical_line()? {
                    None => break,
                    Some((look, complete)) => {
                        if look.starts_with("SNMP") {
                            let mut ahead = Pending {
                                text: look,
                                complete,
                            };
                            if !ahead.complete {
                                self.wait_for_completion(&mut ahead).await?;
                            }
                            self.read_ahead = Some(ahead);
                            break;
                        }
                        pending.text.push('\n');
                        pending.text.push_str(&look);
                        if !complete {
                            pending.complete = complete;
                            self.wait_for_completion(&mut pending).await?;
                            break;
                        }
                    }
                }
            }
        }

        self.position.last_line += 1;
        self.position.last_size = self
            .file
            .stream_position()
            .map_err(|e| TailerError::Io(self.log_path.clone(), e))?;
        debug!(
            log = %self.log_path.display(),
            line = self.position.last_line,
            "read logical trap record"
        );
        Ok(Some((self.position, pending.text)))
    }
}

impl<C: Clock> std::fmt::Debug for LogTailer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogTailer")
            .field("log_path", &self.log_path)
            .field("position", &self.position)
            .finish()
    }
}

#[cfg(test)]
#[path = "tailer_tests.rs"]
mod tests;
