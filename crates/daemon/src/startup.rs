// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires a loaded [`Config`] into a ready-to-run [`Dispatcher`].

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use trapd_core::SystemClock;
use trapd_engine::{Dispatcher, DispatcherConfig, WorkerDeps};
use trapd_filter::{FilterEngine, NoFilterSource};
use trapd_forward::{CommandTrapForwarder, ForwardConfig, TrapForwarder};
use trapd_guard::{SourceLocker, StormGuard, StormGuardConfig};
use trapd_parser::TrapParser;
use trapd_storage::{NoopAlertEvaluator, Persister, SqliteTrapStore};
use trapd_tailer::{LogTailer, TailerError};

use crate::config::Config;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to open primary log: {0}")]
    PrimaryTailer(#[source] TailerError),
    #[error("failed to open secondary log: {0}")]
    SecondaryTailer(#[source] TailerError),
    #[error("failed to open trap store: {0}")]
    Store(#[source] trapd_storage::StoreError),
}

const FORWARD_BINARY: &str = "snmptrap";
const FORWARD_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn build_dispatcher(config: &Config) -> Result<Dispatcher<SystemClock>, StartupError> {
    let clock = SystemClock;

    let primary = LogTailer::open(&config.snmp_logfile, clock)
        .await
        .map_err(StartupError::PrimaryTailer)?;

    let secondary = match &config.snmp_extlog {
        Some(path) => Some(
            LogTailer::open(path, clock)
                .await
                .map_err(StartupError::SecondaryTailer)?,
        ),
        None => None,
    };

    let store = SqliteTrapStore::open(&config.database_path).map_err(StartupError::Store)?;
    let persister = Arc::new(Persister::new(
        Arc::new(store),
        Arc::new(NoopAlertEvaluator),
        clock,
    ));

    let locker = Arc::new(SourceLocker::new(config.lock_mode));

    let storm = StormGuard::new(
        StormGuardConfig {
            window_seconds: config.storm_window_seconds,
            threshold: config.storm_threshold,
            silence_period_seconds: config.storm_silence_period_seconds,
        },
        clock,
    );

    // No external compiled-pattern source wired up yet; filters are
    // reloadable configuration this daemon does not currently source from
    // anywhere, so it runs wide open until one is.
    let filter = Arc::new(FilterEngine::new(&NoFilterSource));

    let forwarder: Option<(Arc<dyn TrapForwarder>, ForwardConfig)> = if config.forward_trap {
        info!(target = %config.forward_ip, "trap forwarding enabled");
        Some((
            Arc::new(CommandTrapForwarder::new(
                PathBuf::from(FORWARD_BINARY),
                FORWARD_TIMEOUT,
            )),
            ForwardConfig {
                version: config.forward_version,
                target_ip: config.forward_ip.clone(),
                community: config.forward_community.clone(),
                user: config.forward_user.clone(),
                auth: config.forward_auth.clone(),
                privpass: config.forward_privpass.clone(),
            },
        ))
    } else {
        None
    };

    let deps = WorkerDeps {
        parser: TrapParser::new(config.use_pdu_address),
        filter,
        forwarder,
        persister,
        locker: locker.clone(),
        clock,
        snmp_delay: Duration::from_secs(config.snmp_delay_secs),
    };

    let dispatcher_config = DispatcherConfig {
        tick_period: Duration::from_secs(config.tick_period_secs),
        worker_count: config.worker_count,
        queue_capacity: 256,
        use_pdu_address: config.use_pdu_address,
    };

    Ok(Dispatcher::new(
        primary,
        secondary,
        storm,
        locker,
        deps,
        dispatcher_config,
    ))
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;
