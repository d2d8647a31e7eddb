// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured logging setup: `EnvFilter` over `RUST_LOG` (default `info`),
//! writing to a rolling file via `tracing-appender`.

use std::path::Path;

use thiserror::Error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log directory {0}: {1}")]
    CreateDir(std::path::PathBuf, #[source] std::io::Error),
}

/// Installs the global subscriber and returns the non-blocking writer guard,
/// which must be held for the process lifetime to guarantee flushed writes.
pub fn init(log_path: &Path) -> Result<tracing_appender::non_blocking::WorkerGuard, LoggingError> {
    let dir = log_path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(|e| LoggingError::CreateDir(dir.to_path_buf(), e))?;

    let file_name = log_path
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("trapd.log"));
    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
