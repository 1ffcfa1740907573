//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::domain::address::InstanceFailure;
use crate::domain::run::RunId;

// ── Executor errors ───────────────────────────────────────────────────────────

/// Errors raised while setting up or supervising an engine run.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("engine binary '{name}' not found (searched: {searched})")]
    BinaryNotFound { name: String, searched: String },

    #[error("cannot create working directory {path}")]
    WorkingDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start {binary}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// The engine was started and is still supervised; only its log is missing.
    #[error("cannot create log {path} for run {run}")]
    LogFile {
        run: RunId,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("run {run} failed: {reason}")]
    RunFailed { run: RunId, reason: String },

    #[error("run {run} did not finish within {timeout:?} (the process keeps running)")]
    WaitTimedOut { run: RunId, timeout: Duration },

    #[error("run {run} was abandoned before reporting completion")]
    Abandoned { run: RunId },

    #[error("no log found for run {run}")]
    UnknownRun { run: RunId },
}

// ── Stage errors ──────────────────────────────────────────────────────────────

/// Errors related to stage selection.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("platform '{platform}' has no stage named '{name}'")]
    NotFound { platform: String, name: String },

    #[error("platform '{0}' has no provisioning stages")]
    NoStages(String),
}

// ── Gather errors ─────────────────────────────────────────────────────────────

/// Errors raised while extracting host addresses from state.
#[derive(Debug, Error)]
pub enum GatherError {
    #[error("no state recorded in {0}")]
    NoState(PathBuf),

    #[error("{}", describe_instances(.0))]
    Instances(Vec<InstanceFailure>),

    #[error("address for {reference} was not reported within {secs}s")]
    ResolveTimedOut { reference: String, secs: u64 },

    #[error("cluster configuration has no {0}")]
    MissingClusterField(&'static str),
}

fn describe_instances(failures: &[InstanceFailure]) -> String {
    let details: Vec<String> = failures
        .iter()
        .map(|f| format!("control-plane instance {}: {}", f.index, f.reason))
        .collect();
    format!(
        "failed to gather {} control-plane address(es): {}",
        failures.len(),
        details.join("; ")
    )
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown platform: {name}\n\nValid platforms: {valid}")]
    UnknownPlatform { name: String, valid: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
