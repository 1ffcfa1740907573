//! Per-backend extraction of host addresses from engine state.
//!
//! Each backend module knows where its provider records the bootstrap and
//! control-plane addresses. This module holds the shared lookup helpers and
//! dispatches on [`GatherStrategy`].
//!
//! Imports only from `crate::domain`, `crate::application::ports` and the
//! `stagehand_common` state model.

pub mod aws;
pub mod azure;
pub mod baremetal;
pub mod gcp;
pub mod ibmcloud;
pub mod libvirt;
pub mod openstack;
pub mod ovirt;
pub mod vsphere;

use std::time::Duration;

use anyhow::Result;
use stagehand_common::{ResourceInstance, StateDocument};

use crate::application::ports::AddressResolver;
use crate::domain::{ClusterConfig, ControlPlaneIps, GatherError, GatherStrategy};

/// Where one backend records an address: a resource and an attribute path
/// within each of its instances.
#[derive(Debug, Clone, Copy)]
pub struct AddressSource {
    pub module: &'static str,
    pub resource_type: &'static str,
    pub name: &'static str,
    pub path: &'static str,
}

impl AddressSource {
    #[must_use]
    pub const fn new(
        module: &'static str,
        resource_type: &'static str,
        name: &'static str,
        path: &'static str,
    ) -> Self {
        Self {
            module,
            resource_type,
            name,
            path,
        }
    }

    fn describe(&self) -> String {
        if self.module.is_empty() {
            format!("{}.{}:{}", self.resource_type, self.name, self.path)
        } else {
            format!(
                "{}.{}.{}:{}",
                self.module, self.resource_type, self.name, self.path
            )
        }
    }

    /// Instances of the source resource in index order.
    fn instances<'a>(&self, state: &'a StateDocument) -> Result<Vec<&'a ResourceInstance>> {
        let resource = state.lookup_resource(self.module, self.resource_type, self.name)?;
        Ok(resource.instances_in_index_order())
    }

    /// The value at `path` in the first instance.
    fn first_value(&self, state: &StateDocument) -> Result<String> {
        let instances = self.instances(state)?;
        let first = instances
            .first()
            .ok_or_else(|| anyhow::anyhow!("{} has no instances", self.describe()))?;
        Ok(first.string_at(self.path)?.to_string())
    }
}

/// Try each source in priority order and return the first address found.
///
/// A source is skipped when its resource is absent, has no instances, or
/// has no value at the path.
///
/// # Errors
///
/// Returns an error listing every attempted source when none yields a value.
pub fn first_address(state: &StateDocument, sources: &[AddressSource]) -> Result<String> {
    let mut attempts = Vec::with_capacity(sources.len());
    for source in sources {
        match source.first_value(state) {
            Ok(ip) => return Ok(ip),
            Err(e) => {
                tracing::debug!(source = %source.describe(), error = %e, "address source skipped");
                attempts.push(format!("{}: {e}", source.describe()));
            }
        }
    }
    anyhow::bail!("no address found ({})", attempts.join("; "))
}

/// Read `source.path` from every instance of the source resource.
///
/// Failures are recorded per instance and never stop the walk.
///
/// # Errors
///
/// Returns an error only if the resource itself is missing from state.
pub fn instance_addresses(state: &StateDocument, source: &AddressSource) -> Result<ControlPlaneIps> {
    let mut ips = ControlPlaneIps::default();
    for instance in source.instances(state)? {
        ips.push(instance.string_at(source.path).map(str::to_string));
    }
    Ok(ips)
}

/// Resolve one managed-object reference within `wait`.
///
/// # Errors
///
/// Returns [`GatherError::ResolveTimedOut`] when the resolver does not answer
/// in time, or the resolver's own error.
pub async fn resolve_within(
    resolver: &impl AddressResolver,
    reference: &str,
    wait: Duration,
) -> Result<String> {
    match tokio::time::timeout(wait, resolver.resolve(reference)).await {
        Ok(resolved) => resolved,
        Err(_) => Err(GatherError::ResolveTimedOut {
            reference: reference.to_string(),
            secs: wait.as_secs(),
        }
        .into()),
    }
}

/// Resolve the reference stored at `source.path` of every instance.
///
/// # Errors
///
/// Returns an error only if the resource itself is missing from state.
pub async fn resolved_instance_addresses(
    state: &StateDocument,
    source: &AddressSource,
    resolver: &impl AddressResolver,
    wait: Duration,
) -> Result<ControlPlaneIps> {
    let mut ips = ControlPlaneIps::default();
    for instance in source.instances(state)? {
        let outcome = match instance.string_at(source.path) {
            Ok(reference) => resolve_within(resolver, reference, wait).await,
            Err(e) => Err(e.into()),
        };
        ips.push(outcome.map_err(|e| format!("{e:#}")));
    }
    Ok(ips)
}

/// Shared inputs for strategies that need more than the state document.
pub struct GatherContext<'a, R: AddressResolver> {
    pub cluster: &'a ClusterConfig,
    pub resolver: &'a R,
    /// Upper bound on each resolver call.
    pub wait: Duration,
}

/// Whether `strategy` reads engine state at all.
#[must_use]
pub fn reads_state(strategy: GatherStrategy) -> bool {
    !matches!(
        strategy,
        GatherStrategy::BareMetal | GatherStrategy::Unsupported
    )
}

/// Bootstrap host address according to `strategy`.
///
/// # Errors
///
/// Returns an error when no source yields an address.
pub async fn bootstrap_ip<R: AddressResolver>(
    strategy: GatherStrategy,
    state: &StateDocument,
    ctx: &GatherContext<'_, R>,
) -> Result<String> {
    match strategy {
        GatherStrategy::Aws => aws::bootstrap_ip(state),
        GatherStrategy::Azure => azure::bootstrap_ip(state),
        GatherStrategy::Gcp => gcp::bootstrap_ip(state),
        GatherStrategy::IbmCloud => ibmcloud::bootstrap_ip(state),
        GatherStrategy::Libvirt => libvirt::bootstrap_ip(state),
        GatherStrategy::OpenStack => openstack::bootstrap_ip(state),
        GatherStrategy::Ovirt => ovirt::bootstrap_ip(state, ctx.resolver, ctx.wait).await,
        GatherStrategy::VSphere => vsphere::bootstrap_ip(state, ctx.resolver, ctx.wait).await,
        GatherStrategy::BareMetal => baremetal::bootstrap_ip(ctx.cluster),
        GatherStrategy::Unsupported => Ok(String::new()),
    }
}

/// Control-plane addresses according to `strategy`, in instance index order.
///
/// # Errors
///
/// Returns an error when the control-plane resource is missing entirely.
/// Per-instance failures are carried in the returned [`ControlPlaneIps`].
pub async fn control_plane_ips<R: AddressResolver>(
    strategy: GatherStrategy,
    state: &StateDocument,
    ctx: &GatherContext<'_, R>,
) -> Result<ControlPlaneIps> {
    match strategy {
        GatherStrategy::Aws => aws::control_plane_ips(state),
        GatherStrategy::Azure => azure::control_plane_ips(state),
        GatherStrategy::Gcp => gcp::control_plane_ips(state),
        GatherStrategy::IbmCloud => ibmcloud::control_plane_ips(state),
        GatherStrategy::Libvirt => libvirt::control_plane_ips(state),
        GatherStrategy::OpenStack => openstack::control_plane_ips(state),
        GatherStrategy::Ovirt => ovirt::control_plane_ips(state, ctx.resolver, ctx.wait).await,
        GatherStrategy::VSphere => vsphere::control_plane_ips(state, ctx.resolver, ctx.wait).await,
        GatherStrategy::BareMetal => baremetal::control_plane_ips(ctx.cluster),
        GatherStrategy::Unsupported => Ok(ControlPlaneIps::default()),
    }
}
