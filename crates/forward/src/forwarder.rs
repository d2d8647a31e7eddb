// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::translate::{translate_varbinds, Varbind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardVersion {
    V1,
    V2c,
    V3,
}

/// Downstream target and credentials; mirrors the `snmp_forward_*`
/// configuration keys.
#[derive(Debug, Clone)]
pub struct ForwardConfig {
    pub version: ForwardVersion,
    pub target_ip: String,
    pub community: String,
    pub user: String,
    pub auth: String,
    pub privpass: String,
}

/// Everything the forwarder needs from one admitted trap. `specific_value`
/// is the v1 `value` field; it is empty for v2 traps and is sent empty
/// rather than inferred, matching the parsed trap's own fields.
#[derive(Debug, Clone)]
pub struct ForwardInvocation {
    pub enterprise_oid: String,
    pub generic_type: i32,
    pub specific_value: String,
    pub payload: String,
}

impl ForwardInvocation {
    pub fn varbinds(&self) -> Vec<Varbind> {
        translate_varbinds(&self.payload)
    }
}

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("failed to spawn forwarder command: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("forwarder exited with status {0}")]
    NonZeroExit(std::process::ExitStatus),
    #[error("forwarder timed out after {0:?}")]
    Timeout(Duration),
}

#[async_trait]
pub trait TrapForwarder: Send + Sync {
    async fn forward(
        &self,
        config: &ForwardConfig,
        invocation: &ForwardInvocation,
    ) -> Result<(), ForwardError>;
}

/// Invokes an external `snmptrap`-equivalent binary. Forwarding failures are
/// the caller's to log-and-ignore; they must never block the pipeline.
pub struct CommandTrapForwarder {
    binary: PathBuf,
    timeout: Duration,
}

impl CommandTrapForwarder {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    fn build_args(config: &ForwardConfig, invocation: &ForwardInvocation) -> Vec<String> {
        let mut args = vec!["-v".to_string()];
        match config.version {
            ForwardVersion::V1 => args.push("1".to_string()),
            ForwardVersion::V2c => args.push("2c".to_string()),
            ForwardVersion::V3 => args.push("3".to_string()),
        }

        match config.version {
            ForwardVersion::V1 | ForwardVersion::V2c => {
                args.push("-c".to_string());
                args.push(config.community.clone());
            }
            ForwardVersion::V3 => {
                args.push("-u".to_string());
                args.push(config.user.clone());
                args.push("-a".to_string());
                args.push(config.auth.clone());
                args.push("-X".to_string());
                args.push(config.privpass.clone());
            }
        }

        args.push(config.target_ip.clone());

        if config.version == ForwardVersion::V1 {
            args.push(invocation.enterprise_oid.clone());
            args.push(String::new());
            args.push(invocation.generic_type.to_string());
            args.push(invocation.specific_value.clone());
            args.push(String::new());
        } else {
            args.push(String::new());
            args.push(invocation.enterprise_oid.clone());
        }

        for varbind in invocation.varbinds() {
            args.push(varbind.oid);
            args.push(varbind.letter.to_string());
            args.push(varbind.value);
        }

        args
    }
}

#[async_trait]
impl TrapForwarder for CommandTrapForwarder {
    async fn forward(
        &self,
        config: &ForwardConfig,
        invocation: &ForwardInvocation,
    ) -> Result<(), ForwardError> {
        let args = Self::build_args(config, invocation);
        let run = tokio::process::Command::new(&self.binary).args(&args).output();

        match tokio::time::timeout(self.timeout, run).await {
            Ok(Ok(output)) if output.status.success() => Ok(()),
            Ok(Ok(output)) => Err(ForwardError::NonZeroExit(output.status)),
            Ok(Err(err)) => Err(ForwardError::Spawn(err)),
            Err(_) => Err(ForwardError::Timeout(self.timeout)),
        }
    }
}

/// Used when forwarding is disabled, or in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTrapForwarder;

#[async_trait]
impl TrapForwarder for NoopTrapForwarder {
    async fn forward(
        &self,
        _config: &ForwardConfig,
        _invocation: &ForwardInvocation,
    ) -> Result<(), ForwardError> {
        warn!("trap forwarding disabled, dropping forward request");
        Ok(())
    }
}

#[cfg(test)]
#[path = "forwarder_tests.rs"]
mod tests;
