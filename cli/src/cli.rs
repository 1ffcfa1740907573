//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, OutputFlags};
use crate::commands;

/// Staged infrastructure provisioning with the IaC engine
#[derive(Parser)]
#[command(
    name = "stagehand",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Log debug details to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the provisioning stages of a platform
    Stages(commands::stages::StagesArgs),

    /// Initialise and apply stages in order
    Apply(commands::apply::ApplyArgs),

    /// Destroy the bootstrap stages, or one named stage
    Destroy(commands::destroy::DestroyArgs),

    /// Print bootstrap and control-plane addresses from stage state
    Addresses(commands::addresses::AddressesArgs),

    /// Show the status of a run
    Status(commands::RunArgs),

    /// Print the combined output of a run
    Logs(commands::RunArgs),

    /// Write a tar.gz snapshot of a working directory
    Archive(commands::archive::ArchiveArgs),

    /// Remove a working directory
    Cleanup(commands::DirArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            json,
            quiet,
            no_color,
            verbose: _,
            command,
        } = self;
        let app = AppContext::new(&OutputFlags {
            no_color,
            quiet,
            json,
        })?;

        match command {
            Command::Stages(args) => commands::stages::run(&app, &args),
            Command::Apply(args) => commands::apply::run(&app, args).await,
            Command::Destroy(args) => commands::destroy::run(&app, args).await,
            Command::Addresses(args) => commands::addresses::run(&app, &args).await,
            Command::Status(args) => commands::status::run(&app, &args),
            Command::Logs(args) => commands::logs::run(&app, &args),
            Command::Archive(args) => commands::archive::run(&app, &args),
            Command::Cleanup(args) => commands::cleanup::run(&app, &args),
        }
    }
}
