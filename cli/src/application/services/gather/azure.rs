//! Azure: the bootstrap host may have a public IP resource; otherwise its
//! NIC's private address is used.

use anyhow::Result;
use stagehand_common::StateDocument;

use super::{AddressSource, first_address, instance_addresses};
use crate::domain::ControlPlaneIps;

const BOOTSTRAP: &[AddressSource] = &[
    AddressSource::new(
        "module.bootstrap",
        "azurerm_public_ip",
        "bootstrap_public_ip_v4",
        "ip_address",
    ),
    AddressSource::new(
        "module.bootstrap",
        "azurerm_network_interface",
        "bootstrap",
        "private_ip_address",
    ),
];

const MASTERS: AddressSource = AddressSource::new(
    "module.master",
    "azurerm_network_interface",
    "master",
    "private_ip_address",
);

/// # Errors
///
/// Returns an error when no bootstrap address is recorded.
pub fn bootstrap_ip(state: &StateDocument) -> Result<String> {
    first_address(state, BOOTSTRAP)
}

/// # Errors
///
/// Returns an error when the master NICs are not in state.
pub fn control_plane_ips(state: &StateDocument) -> Result<ControlPlaneIps> {
    instance_addresses(state, &MASTERS)
}
