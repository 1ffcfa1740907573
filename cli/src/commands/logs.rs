//! `stagehand logs` — print the combined output of a run.

use std::io::Write;

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::commands::RunArgs;

/// Run the logs command.
///
/// # Errors
///
/// Returns an error if the run has no log or stdout cannot be written.
pub fn run(app: &AppContext, args: &RunArgs) -> Result<()> {
    let exec = app.inspect_executor(&args.dir)?;
    let mut log = exec.output(args.run)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    std::io::copy(&mut log, &mut out).context("writing run log")?;
    out.flush().context("writing run log")?;
    Ok(())
}
