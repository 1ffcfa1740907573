//! libvirt: domains report DHCP leases under `network_interface[].addresses`.
//! Control-plane domains are declared in the root module.

use anyhow::Result;
use stagehand_common::StateDocument;

use super::{AddressSource, first_address, instance_addresses};
use crate::domain::ControlPlaneIps;

const BOOTSTRAP: &[AddressSource] = &[AddressSource::new(
    "module.bootstrap",
    "libvirt_domain",
    "bootstrap",
    "network_interface.0.addresses.0",
)];

const MASTERS: AddressSource = AddressSource::new(
    "",
    "libvirt_domain",
    "master",
    "network_interface.0.addresses.0",
);

/// # Errors
///
/// Returns an error when the bootstrap domain has no lease recorded.
pub fn bootstrap_ip(state: &StateDocument) -> Result<String> {
    first_address(state, BOOTSTRAP)
}

/// # Errors
///
/// Returns an error when the master domains are not in the root module.
pub fn control_plane_ips(state: &StateDocument) -> Result<ControlPlaneIps> {
    instance_addresses(state, &MASTERS)
}
