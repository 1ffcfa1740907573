//! `stagehand cleanup` — remove a working directory.

use anyhow::Result;

use crate::app::AppContext;
use crate::commands::DirArgs;

/// Run the cleanup command. Removal failures are logged, not returned.
///
/// # Errors
///
/// Returns an error if the directory does not exist.
pub fn run(app: &AppContext, args: &DirArgs) -> Result<()> {
    let exec = app.inspect_executor(&args.dir)?;
    exec.cleanup();
    if args.dir.exists() {
        app.output
            .warn(&format!("{} could not be fully removed", args.dir.display()));
    } else {
        app.output.success(&format!("removed {}", args.dir.display()));
    }
    Ok(())
}
