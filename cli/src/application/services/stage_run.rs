//! Application service — apply and destroy stages.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All engine invocations are routed through the injected `EngineRunner`.
//!
//! Runs are never retried here. The engine converges against existing
//! state, so a caller that wants to retry simply calls again.

use anyhow::{Context, Result};

use crate::application::ports::{EngineRunner, ProgressReporter};
use crate::domain::{RunId, Stage};

/// Initialise the working directory and apply `stage`.
///
/// # Errors
///
/// Returns an error naming the stage and directory if either `init` or
/// `apply` fails.
pub async fn apply_stage(
    runner: &impl EngineRunner,
    stage: &Stage,
    extra_args: &[String],
) -> Result<RunId> {
    let dir = runner.working_dir().display().to_string();
    tracing::info!(stage = %stage.name, dir = %dir, "applying stage");

    runner
        .run_to_completion(&stage.init_args())
        .await
        .with_context(|| format!("initializing stage {} in {dir}", stage.name))?;

    let run = runner
        .run_to_completion(&stage.apply_args(extra_args))
        .await
        .with_context(|| format!("applying stage {} in {dir}", stage.name))?;

    tracing::info!(stage = %stage.name, %run, "stage applied");
    Ok(run)
}

/// Destroy `stage`, scoped to the bootstrap module when the stage is
/// destroyed together with the bootstrap host.
///
/// # Errors
///
/// Returns an error naming the stage and directory if `destroy` fails.
pub async fn destroy_stage(
    runner: &impl EngineRunner,
    stage: &Stage,
    extra_args: &[String],
) -> Result<RunId> {
    let dir = runner.working_dir().display().to_string();
    tracing::info!(stage = %stage.name, dir = %dir, scoped = stage.destroy_with_bootstrap(), "destroying stage");

    let run = runner
        .run_to_completion(&stage.destroy_args(extra_args))
        .await
        .with_context(|| format!("destroying stage {} in {dir}", stage.name))?;

    tracing::info!(stage = %stage.name, %run, "stage destroyed");
    Ok(run)
}

/// Apply every stage in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the first stage failure; later stages are not attempted.
pub async fn apply_all(
    runner: &impl EngineRunner,
    stages: &[Stage],
    extra_args: &[String],
    reporter: &impl ProgressReporter,
) -> Result<Vec<RunId>> {
    let mut runs = Vec::with_capacity(stages.len());
    for stage in stages {
        reporter.step(&format!("applying stage {}...", stage.name));
        runs.push(apply_stage(runner, stage, extra_args).await?);
        reporter.success(&format!("stage {} applied", stage.name));
    }
    Ok(runs)
}

/// Destroy the bootstrap-scoped stages in sequence order.
///
/// # Errors
///
/// Returns the first stage failure; later stages are not attempted.
pub async fn destroy_bootstrap(
    runner: &impl EngineRunner,
    stages: &[Stage],
    extra_args: &[String],
    reporter: &impl ProgressReporter,
) -> Result<Vec<RunId>> {
    let mut runs = Vec::new();
    for stage in stages.iter().filter(|s| s.destroy_with_bootstrap()) {
        reporter.step(&format!("destroying bootstrap resources of stage {}...", stage.name));
        runs.push(destroy_stage(runner, stage, extra_args).await?);
        reporter.success(&format!("stage {} destroyed", stage.name));
    }
    if runs.is_empty() {
        reporter.warn("no stage is destroyed with the bootstrap host");
    }
    Ok(runs)
}
