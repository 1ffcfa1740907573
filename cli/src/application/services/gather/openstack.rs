//! OpenStack: a floating IP is attached to the bootstrap host when external
//! networking is configured; instances report `access_ip_v4` otherwise.

use anyhow::Result;
use stagehand_common::StateDocument;

use super::{AddressSource, first_address, instance_addresses};
use crate::domain::ControlPlaneIps;

const BOOTSTRAP: &[AddressSource] = &[
    AddressSource::new(
        "module.bootstrap",
        "openstack_networking_floatingip_v2",
        "bootstrap_fip",
        "address",
    ),
    AddressSource::new(
        "module.bootstrap",
        "openstack_compute_instance_v2",
        "bootstrap",
        "access_ip_v4",
    ),
];

const MASTERS: AddressSource = AddressSource::new(
    "module.masters",
    "openstack_compute_instance_v2",
    "master_conf",
    "access_ip_v4",
);

/// # Errors
///
/// Returns an error when no bootstrap address is recorded.
pub fn bootstrap_ip(state: &StateDocument) -> Result<String> {
    first_address(state, BOOTSTRAP)
}

/// # Errors
///
/// Returns an error when the master instances are not in state.
pub fn control_plane_ips(state: &StateDocument) -> Result<ControlPlaneIps> {
    instance_addresses(state, &MASTERS)
}
