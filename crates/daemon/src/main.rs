// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! trapingestd
//!
//! Tails one or two externally-appended SNMP trap logs, parses and
//! normalizes each record, applies storm protection and optional
//! per-source serialization, runs it past configured filters, optionally
//! forwards it downstream, and persists it to the relational store.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;
mod logging;
mod startup;

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tracing::{error, info};

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" => {
                println!("trapingestd {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" => {
                println!("trapingestd {}", env!("CARGO_PKG_VERSION"));
                println!("SNMP trap ingestion daemon.");
                println!();
                println!("USAGE:");
                println!("    trapingestd");
                println!();
                println!("Configuration is read from $TRAPD_CONFIG, falling back to");
                println!("/etc/trapd/trapd.conf.");
                return Ok(());
            }
            other => {
                eprintln!("error: unexpected argument '{other}'");
                eprintln!("usage: trapingestd [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let config = Config::load()?;
    let log_dir = config
        .database_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| std::path::PathBuf::from("/var/log/trapd"));
    let _log_guard = logging::init(&log_dir.join("trapingestd.log"))?;

    info!("starting trapingestd");

    let mut dispatcher = startup::build_dispatcher(&config).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let run = tokio::spawn(async move {
        if let Err(err) = dispatcher.run(shutdown_rx).await {
            error!(error = %err, "dispatcher stopped with an error");
        }
    });

    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        _ = sigint.recv() => info!("received SIGINT, shutting down"),
    }

    let _ = shutdown_tx.send(true);
    let _ = run.await;

    info!("trapingestd stopped");
    Ok(())
}
