//! Bare metal: hosts are not created by the engine, so addresses come from
//! the cluster description rather than from state.

use anyhow::Result;

use crate::domain::{ClusterConfig, ControlPlaneIps, GatherError};

/// # Errors
///
/// Returns [`GatherError::MissingClusterField`] when no bootstrap address is
/// configured.
pub fn bootstrap_ip(cluster: &ClusterConfig) -> Result<String> {
    cluster
        .baremetal
        .as_ref()
        .and_then(|bm| bm.bootstrap_ip.clone())
        .filter(|ip| !ip.is_empty())
        .ok_or_else(|| GatherError::MissingClusterField("baremetal.bootstrap_ip").into())
}

/// Addresses of the configured `master` hosts, in declaration order.
///
/// # Errors
///
/// Returns [`GatherError::MissingClusterField`] when no bare-metal section is
/// configured.
pub fn control_plane_ips(cluster: &ClusterConfig) -> Result<ControlPlaneIps> {
    let bm = cluster
        .baremetal
        .as_ref()
        .ok_or(GatherError::MissingClusterField("baremetal"))?;
    let mut ips = ControlPlaneIps::default();
    for host in bm.hosts.iter().filter(|h| h.role == "master") {
        if host.ip.is_empty() {
            ips.push::<String>(Err(format!("host {} has no ip", host.name)));
        } else {
            ips.push::<String>(Ok(host.ip.clone()));
        }
    }
    Ok(ips)
}
