// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, error, warn};

use trapd_core::{Clock, SourceId};
use trapd_filter::FilterEngine;
use trapd_forward::{ForwardConfig, ForwardInvocation, TrapForwarder};
use trapd_guard::SourceLocker;
use trapd_parser::TrapParser;
use trapd_storage::Persister;

use crate::task::Task;

/// Everything a worker needs to take a raw line through parse → filter →
/// (forward) → persist → release, shared read-only (or internally
/// synchronized) across the whole pool.
pub struct WorkerDeps<C: Clock> {
    pub parser: TrapParser,
    pub filter: Arc<FilterEngine>,
    pub forwarder: Option<(Arc<dyn TrapForwarder>, ForwardConfig)>,
    pub persister: Arc<Persister<C>>,
    pub locker: Arc<SourceLocker>,
    pub clock: C,
    pub snmp_delay: Duration,
}

/// Releases a source's lock when dropped, whether `process_task` returns
/// normally or the spawned task unwinds from a panic partway through.
struct LockGuard {
    locker: Arc<SourceLocker>,
    source: SourceId,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        self.locker.release(&self.source);
    }
}

pub(crate) async fn run_worker<C: Clock>(
    rx: Arc<AsyncMutex<tokio::sync::mpsc::Receiver<Task>>>,
    deps: Arc<WorkerDeps<C>>,
) {
    loop {
        let task = {
            let mut rx = rx.lock().await;
            match rx.recv().await {
                Some(task) => task,
                None => return,
            }
        };

        // Spawned so a panic while processing one trap unwinds only that
        // task, not this worker's receive loop; the next task still gets
        // picked up normally.
        let source = task.source.clone();
        let handle = tokio::spawn(process_task(task, deps.clone()));
        if let Err(err) = handle.await {
            error!(source = %source, error = %err, "worker task panicked, dropping the trap");
        }
    }
}

async fn process_task<C: Clock>(task: Task, deps: Arc<WorkerDeps<C>>) {
    let Task {
        source,
        raw_line,
        done,
    } = task;

    let _guard = LockGuard {
        locker: deps.locker.clone(),
        source: source.clone(),
    };

    let trap = match deps.parser.parse(&raw_line, &deps.clock) {
        Ok(trap) => trap,
        Err(err) => {
            warn!(source = %source, error = %err, "dropping malformed trap line");
            let _ = done.send(());
            return;
        }
    };

    if deps.filter.matches(&trap.raw_tail) {
        debug!(source = %source, oid = %trap.oid, "trap dropped by filter");
        let _ = done.send(());
        return;
    }

    if let Some((forwarder, config)) = &deps.forwarder {
        let invocation = ForwardInvocation {
            enterprise_oid: trap.oid.clone(),
            generic_type: trap.generic_type,
            specific_value: trap.value.clone(),
            payload: trap.custom_payload.clone(),
        };
        if let Err(err) = forwarder.forward(config, &invocation).await {
            warn!(source = %source, error = %err, "trap forwarding failed");
        }
    }

    if let Err(err) = deps.persister.persist(&trap).await {
        warn!(source = %source, error = %err, "trap persistence failed, trap lost");
    }

    drop(_guard);

    if !deps.snmp_delay.is_zero() {
        tokio::time::sleep(deps.snmp_delay).await;
    }

    let _ = done.send(());
}
