//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and the `stagehand_common`
//! state model — never from `crate::infra`, `crate::commands`, or
//! `crate::output`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;
use stagehand_common::StateDocument;

use crate::domain::{RunId, StagehandConfig};

// ── Engine Port ───────────────────────────────────────────────────────────────

/// Runs the IaC engine inside one stage working directory.
#[allow(async_fn_in_trait)]
pub trait EngineRunner {
    /// Directory the engine runs in; used for error context.
    fn working_dir(&self) -> &Path;

    /// Start the engine with `args` and wait for the run to complete.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot start, if waiting gives up, or
    /// if the run exits unsuccessfully (carrying the failure marker text).
    async fn run_to_completion(&self, args: &[String]) -> Result<RunId>;
}

// ── State Port ────────────────────────────────────────────────────────────────

/// Read-only access to the state documents persisted by the engine.
pub trait StateReader {
    /// Load `state_file` from `dir`. A missing file is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is unreadable or malformed.
    fn read_state(&self, dir: &Path, state_file: &str) -> Result<Option<StateDocument>>;
}

// ── Collaborator Ports ────────────────────────────────────────────────────────

/// Resolves a managed-object reference (VM moid, VM id, ...) to an IP address.
///
/// Implementations may block while the hypervisor waits for a DHCP lease;
/// callers bound the wait.
#[allow(async_fn_in_trait)]
pub trait AddressResolver {
    async fn resolve(&self, reference: &str) -> Result<String>;
}

/// Translates platform credentials into engine environment variables.
pub trait CredentialSource {
    /// # Errors
    ///
    /// Returns an error if the credentials cannot be read.
    fn environment(&self) -> Result<BTreeMap<String, String>>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts short-lived helper process execution so infrastructure can be
/// swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts loading the tool configuration.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<StagehandConfig>;
    /// Path the configuration is read from.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
