//! `stagehand apply` — initialise and apply the stages of a platform.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::stage_run;
use crate::domain::{Platform, Stage, StageError, find_stage, stages_for_platform};
use crate::infra::credentials::YamlCredentialsFile;
use crate::output::TerminalReporter;

/// Arguments for the apply command.
#[derive(Args)]
pub struct ApplyArgs {
    /// Stage working directory holding the engine configuration
    #[arg(long)]
    pub dir: PathBuf,

    /// Target platform
    #[arg(long)]
    pub platform: Platform,

    /// Apply only this stage instead of the whole sequence
    #[arg(long)]
    pub stage: Option<String>,

    /// YAML map of credential environment variables for the engine
    #[arg(long)]
    pub credentials: Option<PathBuf>,

    /// Extra arguments passed to the engine after `--`
    #[arg(last = true)]
    pub extra: Vec<String>,
}

/// Stages selected by `--stage`, or the whole platform sequence.
///
/// # Errors
///
/// Returns an error if the named stage does not exist or the platform has
/// no stages.
pub fn selected_stages(platform: Platform, stage: Option<&str>) -> Result<Vec<Stage>> {
    let stages = match stage {
        Some(name) => vec![find_stage(platform, name)?],
        None => stages_for_platform(platform),
    };
    if stages.is_empty() {
        return Err(StageError::NoStages(platform.to_string()).into());
    }
    Ok(stages)
}

/// Run the apply command.
///
/// # Errors
///
/// Returns an error if setup fails or any stage fails to apply.
pub async fn run(app: &AppContext, args: ApplyArgs) -> Result<()> {
    let stages = selected_stages(args.platform, args.stage.as_deref())?;
    let mut exec = app.engine_executor(&args.dir)?;
    if let Some(path) = args.credentials {
        exec.add_credentials(&YamlCredentialsFile::new(path))?;
    }

    let reporter = TerminalReporter::new(&app.output);
    let runs = match stage_run::apply_all(&exec, &stages, &args.extra, &reporter).await {
        Ok(runs) => runs,
        Err(e) => {
            reporter.fail("apply failed");
            return Err(e);
        }
    };
    app.renderer().render_runs("apply", &runs)
}
