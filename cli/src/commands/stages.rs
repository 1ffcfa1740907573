//! `stagehand stages` — list the stage sequence of a platform.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::domain::{Platform, stages_for_platform};

/// Arguments for the stages command.
#[derive(Args)]
pub struct StagesArgs {
    /// Target platform (aws, azure, gcp, ibmcloud, libvirt, openstack, ovirt,
    /// vsphere, baremetal, powervs, none)
    pub platform: Platform,
}

/// Run the stages command.
///
/// # Errors
///
/// Returns an error if JSON rendering fails.
pub fn run(app: &AppContext, args: &StagesArgs) -> Result<()> {
    let stages = stages_for_platform(args.platform);
    app.renderer().render_stages(args.platform, &stages)
}
