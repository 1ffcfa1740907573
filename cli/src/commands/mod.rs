//! Command implementations

pub mod addresses;
pub mod apply;
pub mod archive;
pub mod cleanup;
pub mod destroy;
pub mod logs;
pub mod stages;
pub mod status;

use std::path::PathBuf;

use clap::Args;

use crate::domain::RunId;

/// Arguments naming a stage working directory.
#[derive(Args)]
pub struct DirArgs {
    /// Stage working directory
    #[arg(long)]
    pub dir: PathBuf,
}

/// Arguments naming one run of a working directory.
#[derive(Args)]
pub struct RunArgs {
    /// Stage working directory
    #[arg(long)]
    pub dir: PathBuf,

    /// Run id printed by `apply` or `destroy`
    pub run: RunId,
}
