//! GCP: addresses live on the instance's first network interface; the
//! bootstrap host's NAT address is preferred when it has one.

use anyhow::Result;
use stagehand_common::StateDocument;

use super::{AddressSource, first_address, instance_addresses};
use crate::domain::ControlPlaneIps;

const BOOTSTRAP: &[AddressSource] = &[
    AddressSource::new(
        "module.bootstrap",
        "google_compute_instance",
        "bootstrap",
        "network_interface.0.access_config.0.nat_ip",
    ),
    AddressSource::new(
        "module.bootstrap",
        "google_compute_instance",
        "bootstrap",
        "network_interface.0.network_ip",
    ),
];

const MASTERS: AddressSource = AddressSource::new(
    "module.master",
    "google_compute_instance",
    "master",
    "network_interface.0.network_ip",
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
