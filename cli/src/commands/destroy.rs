//! `stagehand destroy` — tear down bootstrap resources once the cluster is up.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ProgressReporter;
use crate::application::services::stage_run;
use crate::domain::{Platform, StageError, find_stage, stages_for_platform};
use crate::infra::credentials::YamlCredentialsFile;
use crate::output::TerminalReporter;

/// Arguments for the destroy command.
#[derive(Args)]
pub struct DestroyArgs {
    /// Stage working directory
    #[arg(long)]
    pub dir: PathBuf,

    /// Target platform
    #[arg(long)]
    pub platform: Platform,

    /// Destroy only this stage. Without it, every stage destroyed with the
    /// bootstrap host is destroyed.
    #[arg(long)]
    pub stage: Option<String>,

    /// YAML map of credential environment variables for the engine
    #[arg(long)]
    pub credentials: Option<PathBuf>,

    /// Extra arguments passed to the engine after `--`
    #[arg(last = true)]
    pub extra: Vec<String>,
}

/// Run the destroy command.
///
/// # Errors
///
/// Returns an error if setup fails or any destroy run fails.
pub async fn run(app: &AppContext, args: DestroyArgs) -> Result<()> {
    if stages_for_platform(args.platform).is_empty() {
        return Err(StageError::NoStages(args.platform.to_string()).into());
    }
    let mut exec = app.engine_executor(&args.dir)?;
    if let Some(path) = args.credentials {
        exec.add_credentials(&YamlCredentialsFile::new(path))?;
    }

    let reporter = TerminalReporter::new(&app.output);
    let result = match args.stage.as_deref() {
        Some(name) => {
            let stage = find_stage(args.platform, name)?;
            reporter.step(&format!("destroying stage {}...", stage.name));
            stage_run::destroy_stage(&exec, &stage, &args.extra)
                .await
                .map(|run| {
                    reporter.success(&format!("stage {} destroyed", stage.name));
                    vec![run]
                })
        }
        None => {
            let stages = stages_for_platform(args.platform);
            stage_run::destroy_bootstrap(&exec, &stages, &args.extra, &reporter).await
        }
    };

    match result {
        Ok(runs) => app.renderer().render_runs("destroy", &runs),
        Err(e) => {
            reporter.fail("destroy failed");
            Err(e)
        }
    }
}
