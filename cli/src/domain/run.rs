//! Engine run identity, status and environment rules.
//!
//! Pure types only. The executor in `infra::executor` owns the I/O.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Subdirectory of the working directory holding per-run artifacts.
pub const LOG_DIR: &str = "logs";

/// Ambient variables passed through to the engine unchanged.
pub const PASSTHROUGH_VARS: &[&str] = &["DISPLAY", "PATH"];

/// Prefix of ambient variables passed through to the engine, so SSH-based
/// provisioners can reach the caller's agent.
pub const PASSTHROUGH_PREFIX: &str = "SSH_";

/// Variable always forwarded so the engine's plugin and credential caches
/// resolve under the caller's home directory.
pub const HOME_VAR: &str = "HOME";

/// Identifier of one engine run: the OS process id of the engine.
///
/// Process ids are reused by the OS once a process exits, so a `RunId` is
/// only unambiguous together with the working directory whose `logs/`
/// holds its artifacts. Status queries after completion read the failure
/// marker rather than the process table for that reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RunId(pub u32);

impl RunId {
    /// File name of the combined stdout/stderr log.
    #[must_use]
    pub fn log_file_name(self) -> String {
        format!("{}.log", self.0)
    }

    /// File name of the failure marker written when the run exits unsuccessfully.
    #[must_use]
    pub fn failure_marker_name(self) -> String {
        format!("{}.fail", self.0)
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RunId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(RunId)
    }
}

/// Observable status of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum RunStatus {
    /// A process with the run's id currently exists.
    Running,
    Succeeded,
    /// The failure marker exists; carries its contents.
    Failed(String),
    /// No process, no marker and no log: the id was never a run in this directory.
    NotFound,
}

impl RunStatus {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Succeeded | RunStatus::Failed(_))
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Running => f.write_str("running"),
            RunStatus::Succeeded => f.write_str("succeeded"),
            RunStatus::Failed(reason) => write!(f, "failed: {reason}"),
            RunStatus::NotFound => f.write_str("not found"),
        }
    }
}

/// Whether an ambient variable may be inherited by the engine.
#[must_use]
pub fn is_passthrough(name: &str) -> bool {
    PASSTHROUGH_VARS.contains(&name) || name.starts_with(PASSTHROUGH_PREFIX)
}

/// Build the engine environment.
///
/// Allow-listed ambient variables come first, then `HOME`, then the
/// caller's overrides, which win on conflicts. Nothing else from the ambient
/// environment is inherited.
#[must_use]
pub fn engine_environment<I>(
    ambient: I,
    overrides: &BTreeMap<String, String>,
) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut env = BTreeMap::new();
    for (name, value) in ambient {
        if is_passthrough(&name) || name == HOME_VAR {
            env.insert(name, value);
        }
    }
    for (name, value) in overrides {
        env.insert(name.clone(), value.clone());
    }
    env
}
