//! IBM Cloud VPC: a floating IP is attached to the bootstrap node when it is
//! publicly reachable.

use anyhow::Result;
use stagehand_common::StateDocument;

use super::{AddressSource, first_address, instance_addresses};
use crate::domain::ControlPlaneIps;

const BOOTSTRAP: &[AddressSource] = &[
    AddressSource::new(
        "module.bootstrap",
        "ibm_is_floating_ip",
        "bootstrap_floatingip",
        "address",
    ),
    AddressSource::new(
        "module.bootstrap",
        "ibm_is_instance",
        "bootstrap_node",
        "primary_network_interface.0.primary_ipv4_address",
    ),
];

const MASTERS: AddressSource = AddressSource::new(
    "module.master",
    "ibm_is_instance",
    "master_node",
    "primary_network_interface.0.primary_ipv4_address",
);

/// # Errors
///
/// Returns an error when no bootstrap address is recorded.
pub fn bootstrap_ip(state: &StateDocument) -> Result<String> {
    first_address(state, BOOTSTRAP)
}

/// # Errors
///
/// Returns an error when the master nodes are not in state.
pub fn control_plane_ips(state: &StateDocument) -> Result<ControlPlaneIps> {
    instance_addresses(state, &MASTERS)
}
