// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plain key-value configuration file: one `key value` pair per line,
//! `#`-prefixed comments and blank lines ignored. Resolved from
//! `TRAPD_CONFIG`, falling back to `/etc/trapd/trapd.conf`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use trapd_forward::ForwardVersion;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),
    #[error("required key '{0}' is missing from the configuration")]
    MissingRequired(&'static str),
    #[error("key '{0}' has an invalid value '{1}'")]
    InvalidValue(&'static str, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub snmp_logfile: PathBuf,
    pub snmp_extlog: Option<PathBuf>,
    pub tick_period_secs: u64,
    pub worker_count: usize,
    pub storm_threshold: i64,
    pub storm_window_seconds: i64,
    pub storm_silence_period_seconds: i64,
    pub lock_mode: bool,
    pub use_pdu_address: bool,
    pub forward_trap: bool,
    pub forward_version: ForwardVersion,
    pub forward_ip: String,
    pub forward_community: String,
    pub forward_user: String,
    pub forward_auth: String,
    pub forward_privpass: String,
    pub snmp_delay_secs: u64,
    pub database_path: PathBuf,
}

const DEFAULT_CONFIG_PATH: &str = "/etc/trapd/trapd.conf";

impl Config {
    /// Resolves the config file path from `TRAPD_CONFIG`, falling back to
    /// [`DEFAULT_CONFIG_PATH`], and loads it.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("TRAPD_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        let raw = parse_kv(&text);
        Self::from_raw(&raw)
    }

    fn from_raw(raw: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let snmp_logfile = raw
            .get("snmp_logfile")
            .map(PathBuf::from)
            .ok_or(ConfigError::MissingRequired("snmp_logfile"))?;

        let snmp_extlog = raw.get("snmp_extlog").map(PathBuf::from);

        let tick_period_secs = get_u64(raw, "server_threshold", 5)?;
        let tick_period_secs = match raw.get("snmpconsole_threshold") {
            Some(v) => parse_u64("snmpconsole_threshold", v)?,
            None => tick_period_secs,
        };

        let worker_count = get_u64(raw, "snmpconsole_threads", 4)? as usize;
        let storm_threshold = get_i64(raw, "snmp_storm_protection", 0)?;
        let storm_window_seconds = get_i64(raw, "snmp_storm_timeout", 60)?;
        let storm_silence_period_seconds = get_i64(raw, "snmp_storm_silence_period", 0)?;
        let lock_mode = get_bool(raw, "snmpconsole_lock", false)?;
        let use_pdu_address = get_bool(raw, "snmp_pdu_address", false)?;
        let forward_trap = get_bool(raw, "snmp_forward_trap", false)?;

        let forward_version = match raw
            .get("snmp_forward_version")
            .map(String::as_str)
            .unwrap_or("2c")
        {
            "1" => ForwardVersion::V1,
            "2c" | "2" => ForwardVersion::V2c,
            "3" => ForwardVersion::V3,
            other => {
                return Err(ConfigError::InvalidValue(
                    "snmp_forward_version",
                    other.to_string(),
                ))
            }
        };

        let forward_ip = raw.get("snmp_forward_ip").cloned().unwrap_or_default();
        let forward_community = raw
            .get("snmp_forward_community")
            .cloned()
            .unwrap_or_else(|| "public".to_string());
        let forward_user = raw.get("snmp_forward_user").cloned().unwrap_or_default();
        let forward_auth = raw.get("snmp_forward_auth").cloned().unwrap_or_default();
        let forward_privpass = raw
            .get("snmp_forward_privpass")
            .cloned()
            .unwrap_or_default();

        let snmp_delay_secs = get_u64(raw, "snmp_delay", 0)?;

        let database_path = raw
            .get("database_path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/var/lib/trapd/trapd.db"));

        Ok(Config {
            snmp_logfile,
            snmp_extlog,
            tick_period_secs,
            worker_count,
            storm_threshold,
            storm_window_seconds,
            storm_silence_period_seconds,
            lock_mode,
            use_pdu_address,
            forward_trap,
            forward_version,
            forward_ip,
            forward_community,
            forward_user,
            forward_auth,
            forward_privpass,
            snmp_delay_secs,
            database_path,
        })
    }
}

fn parse_kv(text: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once(char::is_whitespace) {
            out.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    out
}

fn parse_u64(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidValue(key, value.to_string()))
}

fn parse_i64(key: &'static str, value: &str) -> Result<i64, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidValue(key, value.to_string()))
}

fn get_u64(raw: &HashMap<String, String>, key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match raw.get(key) {
        Some(v) => parse_u64(key, v),
        None => Ok(default),
    }
}

fn get_i64(raw: &HashMap<String, String>, key: &'static str, default: i64) -> Result<i64, ConfigError> {
    match raw.get(key) {
        Some(v) => parse_i64(key, v),
        None => Ok(default),
    }
}

fn get_bool(raw: &HashMap<String, String>, key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match raw.get(key) {
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(ConfigError::InvalidValue(key, other.to_string())),
        },
        None => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
