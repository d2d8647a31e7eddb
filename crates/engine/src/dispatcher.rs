// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch, Mutex as AsyncMutex};
use tracing::{debug, warn};

use trapd_core::{Clock, SourceId};
use trapd_guard::{SourceLocker, StormDecision, StormGuard};
use trapd_parser::normalize_source;
use trapd_tailer::{LogTailer, TailerError};

use crate::task::Task;
use crate::worker::{run_worker, WorkerDeps};

#[derive(Debug, Error)]
pub enum DispatcherError {
    #[error(transparent)]
    Tailer(#[from] TailerError),
}

#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Cadence of the producer tick (`server_threshold` / `snmpconsole_threshold`).
    pub tick_period: Duration,
    pub worker_count: usize,
    pub queue_capacity: usize,
    /// `snmp_pdu_address`: normalize v1 sources the same way v2 ones always are.
    pub use_pdu_address: bool,
}

/// One producer thread driving a fixed pool of async workers over a bounded
/// channel. The producer waits for each tick's whole batch before starting
/// the next tick, so there is never more than one tick's worth of in-flight
/// work — the live `SourceLocker` state is already an accurate snapshot for
/// the next tick's admission decisions without a separate copy.
pub struct Dispatcher<C: Clock> {
    primary: LogTailer<C>,
    secondary: Option<LogTailer<C>>,
    carry_over: VecDeque<String>,
    storm: StormGuard<C>,
    locker: Arc<SourceLocker>,
    lock_mode: bool,
    use_pdu_address: bool,
    tx: mpsc::Sender<Task>,
    tick_period: Duration,
}

impl<C: Clock> Dispatcher<C> {
    pub fn new(
        primary: LogTailer<C>,
        secondary: Option<LogTailer<C>>,
        storm: StormGuard<C>,
        locker: Arc<SourceLocker>,
        deps: WorkerDeps<C>,
        config: DispatcherConfig,
    ) -> Self {
        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        let rx = Arc::new(AsyncMutex::new(rx));
        let deps = Arc::new(deps);

        for _ in 0..config.worker_count.max(1) {
            tokio::spawn(run_worker(rx.clone(), deps.clone()));
        }

        let lock_mode = locker.lock_mode();

        Self {
            primary,
            secondary,
            carry_over: VecDeque::new(),
            storm,
            locker,
            lock_mode,
            use_pdu_address: config.use_pdu_address,
            tx,
            tick_period: config.tick_period,
        }
    }

    pub fn carry_over_len(&self) -> usize {
        self.carry_over.len()
    }

    /// Runs one producer tick: reset the storm window, drain the carry-over
    /// buffer then each tailer in order, route each admitted line to a
    /// worker, and wait for this tick's whole batch to finish.
    pub async fn tick(&mut self) -> Result<(), DispatcherError> {
        self.storm.tick(self.lock_mode);

        let mut next_carry_over = VecDeque::new();
        let mut tasks = Vec::new();

        let carried: Vec<String> = self.carry_over.drain(..).collect();
        for line in carried {
            self.route_line(line, &mut next_carry_over, &mut tasks);
        }

        // Checkpoint after each successful read, not once at the end of the
        // tick: a crash mid-tick then replays at most the one record whose
        // checkpoint write didn't land, never the whole batch.
        self.primary.check_rotation()?;
        while let Some((_, line)) = self.primary.next().await? {
            self.route_line(line, &mut next_carry_over, &mut tasks);
            self.primary.checkpoint()?;
        }

        if let Some(secondary) = self.secondary.as_mut() {
            secondary.check_rotation()?;
            while let Some((_, line)) = secondary.next().await? {
                self.route_line(line, &mut next_carry_over, &mut tasks);
                secondary.checkpoint()?;
            }
        }

        self.carry_over = next_carry_over;

        let mut waiters = Vec::with_capacity(tasks.len());
        for (source, raw_line) in tasks {
            let (done_tx, done_rx) = oneshot::channel();
            let task = Task {
                source,
                raw_line,
                done: done_tx,
            };
            if self.tx.send(task).await.is_err() {
                warn!("worker pool is gone, dropping remaining tasks for this tick");
                break;
            }
            waiters.push(done_rx);
        }
        for waiter in waiters {
            let _ = waiter.await;
        }

        Ok(())
    }

    /// Runs ticks until `shutdown` carries `true`. Waits for the in-flight
    /// tick to drain before returning; it never drops a tick mid-flight.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<(), DispatcherError> {
        loop {
            if *shutdown.borrow() {
                return Ok(());
            }
            self.tick().await?;
            tokio::select! {
                _ = tokio::time::sleep(self.tick_period) => {}
                _ = shutdown.changed() => {}
            }
        }
    }

    fn route_line(
        &mut self,
        line: String,
        next_carry_over: &mut VecDeque<String>,
        tasks: &mut Vec<(SourceId, String)>,
    ) {
        if !(line.starts_with("SNMPv1[**]") || line.starts_with("SNMPv2[**]")) {
            debug!("skipping line with unrecognized header");
            return;
        }

        let Some(source) = cheap_source(&line, self.use_pdu_address) else {
            debug!("skipping line with no extractable source");
            return;
        };

        match self.storm.decide(&source) {
            StormDecision::Admit => {}
            StormDecision::Dropped => return,
            StormDecision::Silenced { silence_seconds } => {
                warn!(source = %source, silence_seconds, "too many traps from source; silenced");
                return;
            }
        }

        if self.locker.acquire(&source) {
            tasks.push((source, line));
        } else {
            next_carry_over.push_back(line);
        }
    }
}

/// Pulls just the source field out of a logical line without fully parsing
/// it, per the producer's "cheap parse; full parse happens in worker" rule.
fn cheap_source(line: &str, use_pdu_address: bool) -> Option<SourceId> {
    let mut fields = line.splitn(5, "[**]");
    let version = fields.next()?;
    let _date = fields.next()?;
    let _time = fields.next()?;
    let raw_source = fields.next()?;

    let normalize = match version {
        "SNMPv2" => true,
        "SNMPv1" => use_pdu_address,
        _ => return None,
    };

    let source = if normalize {
        normalize_source(raw_source)
    } else {
        raw_source.to_string()
    };
    Some(SourceId::new(source))
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
