//! oVirt: state records the VM id; the engine API reports the address once
//! the guest agent is up.

use std::time::Duration;

use anyhow::{Context, Result};
use stagehand_common::StateDocument;

use super::{AddressSource, resolve_within, resolved_instance_addresses};
use crate::application::ports::AddressResolver;
use crate::domain::ControlPlaneIps;

const BOOTSTRAP: AddressSource = AddressSource::new("module.bootstrap", "ovirt_vm", "bootstrap", "id");

const MASTERS: AddressSource = AddressSource::new("module.masters", "ovirt_vm", "master", "id");

/// # Errors
///
/// Returns an error when the bootstrap VM is not in state or its address is
/// not reported within `wait`.
pub async fn bootstrap_ip(
    state: &StateDocument,
    resolver: &impl AddressResolver,
    wait: Duration,
) -> Result<String> {
    let id = BOOTSTRAP.first_value(state)?;
    resolve_within(resolver, &id, wait)
        .await
        .with_context(|| format!("resolving bootstrap VM {id}"))
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
