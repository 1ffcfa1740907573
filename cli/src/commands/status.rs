//! `stagehand status` — report whether a run is running, succeeded or failed.

use anyhow::Result;

use crate::app::AppContext;
use crate::commands::RunArgs;
use crate::domain::RunStatus;

/// Run the status command.
///
/// Exits with an error for failed and unknown runs so scripts can branch
/// on the exit code.
///
/// # Errors
///
/// Returns an error if the directory does not exist, or the run failed or
/// is unknown.
pub fn run(app: &AppContext, args: &RunArgs) -> Result<()> {
    let exec = app.inspect_executor(&args.dir)?;
    let status = exec.status(args.run);
    tracing::debug!(run = %args.run, %status, "run status");
    app.renderer().render_status(args.run, &status)?;
    match status {
        RunStatus::Running | RunStatus::Succeeded => Ok(()),
        RunStatus::Failed(_) => anyhow::bail!("run {} failed", args.run),
        RunStatus::NotFound => anyhow::bail!(
            "run {} not found in {}",
            args.run,
            args.dir.display()
        ),
    }
}
