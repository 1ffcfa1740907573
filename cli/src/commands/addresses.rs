//! `stagehand addresses` — report host addresses recorded by a stage.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::AddressResolver;
use crate::application::services::addresses::extract_host_addresses;
use crate::application::services::gather::GatherContext;
use crate::domain::stage::address_stage;
use crate::domain::{ClusterConfig, HostAddresses, Stage, find_stage};
use crate::infra::config::load_cluster_config;
use crate::infra::resolver::{CommandAddressResolver, NoAddressResolver};
use crate::infra::state::FsStateReader;

/// Arguments for the addresses command.
#[derive(Args)]
pub struct AddressesArgs {
    /// Stage working directory
    #[arg(long)]
    pub dir: PathBuf,

    /// Cluster description (YAML)
    #[arg(long)]
    pub cluster: PathBuf,

    /// Stage to read; defaults to the stage holding the bootstrap host
    #[arg(long)]
    pub stage: Option<String>,
}

/// Run the addresses command.
///
/// # Errors
///
/// Returns an error if the cluster description or state cannot be read, or
/// the bootstrap address cannot be determined.
pub async fn run(app: &AppContext, args: &AddressesArgs) -> Result<()> {
    let cluster = load_cluster_config(&args.cluster)?;
    let stage = match args.stage.as_deref() {
        Some(name) => find_stage(cluster.platform, name)?,
        None => address_stage(cluster.platform)?,
    };

    let wait = app.config.gather.address_wait();
    let addresses = match &app.config.resolver {
        Some(config) => {
            let resolver = CommandAddressResolver::from_config(config, wait);
            gather(args, &stage, &cluster, &resolver, wait).await?
        }
        None => gather(args, &stage, &cluster, &NoAddressResolver, wait).await?,
    };

    if let Some(err) = addresses.control_plane_error() {
        app.output.warn(&err.to_string());
    }
    app.renderer().render_addresses(&addresses)
}

async fn gather<R: AddressResolver>(
    args: &AddressesArgs,
    stage: &Stage,
    cluster: &ClusterConfig,
    resolver: &R,
    wait: Duration,
) -> Result<HostAddresses> {
    let ctx = GatherContext {
        cluster,
        resolver,
        wait,
    };
    extract_host_addresses(&FsStateReader, &args.dir, stage, &ctx).await
}
