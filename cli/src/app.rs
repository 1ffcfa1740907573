//! Application context — unified state passed to every command handler.
//!
//! `AppContext` is built once in `Cli::run()` from the global flags and the
//! tool configuration. Commands get executors and renderers from it rather
//! than constructing their own.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::StagehandConfig;
use crate::infra::config::YamlConfigStore;
use crate::infra::executor::Executor;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Tool configuration, defaults when no file exists.
    pub config: StagehandConfig,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be loaded.
    pub fn new(flags: &OutputFlags) -> Result<Self> {
        Self::with_store(flags, &YamlConfigStore)
    }

    /// Construct an `AppContext` reading configuration from `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be loaded.
    pub fn with_store(flags: &OutputFlags, store: &impl ConfigStore) -> Result<Self> {
        let config = store.load().context("loading configuration")?;
        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        Ok(Self {
            output: OutputContext::new(flags.no_color, flags.quiet || flags.json),
            mode,
            config,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }

    /// Executor able to run the engine in `dir`, created if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine binary cannot be found or `dir`
    /// cannot be prepared.
    pub fn engine_executor(&self, dir: &Path) -> Result<Executor> {
        let exec = Executor::new(dir, &self.config.engine.binary)?
            .with_run_timeout(self.config.engine.run_timeout());
        Ok(exec)
    }

    /// Executor for inspecting the runs of an existing `dir`. The engine
    /// binary is not looked up.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` does not exist.
    pub fn inspect_executor(&self, dir: &Path) -> Result<Executor> {
        if !dir.is_dir() {
            anyhow::bail!("working directory {} does not exist", dir.display());
        }
        Ok(Executor::with_binary(dir, self.config.engine.binary.clone().into())?)
    }
}
