//! vSphere: state records only the managed object id (`moid`) of each VM.
//! The address is whatever vCenter reports once VMware Tools sees a lease,
//! so every lookup goes through the resolver with a bounded wait.

use std::time::Duration;

use anyhow::{Context, Result};
use stagehand_common::StateDocument;

use super::{AddressSource, resolve_within, resolved_instance_addresses};
use crate::application::ports::AddressResolver;
use crate::domain::ControlPlaneIps;

const BOOTSTRAP: AddressSource = AddressSource::new(
    "module.bootstrap",
    "vsphere_virtual_machine",
    "vm_bootstrap",
    "moid",
);

const MASTERS: AddressSource =
    AddressSource::new("module.master", "vsphere_virtual_machine", "vm_master", "moid");

/// # Errors
///
/// Returns an error when the bootstrap VM is not in state or its address is
/// not reported within `wait`.
pub async fn bootstrap_ip(
    state: &StateDocument,
    resolver: &impl AddressResolver,
    wait: Duration,
) -> Result<String> {
    let moid = BOOTSTRAP.first_value(state)?;
    resolve_within(resolver, &moid, wait)
        .await
        .with_context(|| format!("resolving bootstrap VM {moid}"))
}

/// # Errors
///
/// Returns an error when the master VMs are not in state.
pub async fn control_plane_ips(
    state: &StateDocument,
    resolver: &impl AddressResolver,
    wait: Duration,
) -> Result<ControlPlaneIps> {
    resolved_instance_addresses(state, &MASTERS, resolver, wait).await
}
