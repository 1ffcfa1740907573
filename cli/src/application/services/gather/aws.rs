//! AWS: instances expose `public_ip`/`private_ip`; control-plane hosts are
//! reached through their network interfaces.

use anyhow::Result;
use stagehand_common::StateDocument;

use super::{AddressSource, first_address, instance_addresses};
use crate::domain::ControlPlaneIps;

const BOOTSTRAP: &[AddressSource] = &[
    AddressSource::new("module.bootstrap", "aws_instance", "bootstrap", "public_ip"),
    AddressSource::new("module.bootstrap", "aws_instance", "bootstrap", "private_ip"),
];

const MASTERS: AddressSource = AddressSource::new(
    "module.masters",
    "aws_network_interface",
    "master",
    "private_ip",
);

/// # Errors
///
/// Returns an error when neither a public nor a private address is recorded.
pub fn bootstrap_ip(state: &StateDocument) -> Result<String> {
    first_address(state, BOOTSTRAP)
}

/// # Errors
///
/// Returns an error when the master network interfaces are not in state.
pub fn control_plane_ips(state: &StateDocument) -> Result<ControlPlaneIps> {
    instance_addresses(state, &MASTERS)
}
