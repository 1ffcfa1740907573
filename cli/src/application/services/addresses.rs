//! Application service — host address extraction after a stage applies.
//!
//! Imports only from `crate::domain`, `crate::application::ports` and the
//! `stagehand_common` state model.

use std::path::Path;

use anyhow::{Context, Result};
use stagehand_common::StateDocument;

use crate::application::ports::{AddressResolver, StateReader};
use crate::application::services::gather::{self, GatherContext};
use crate::domain::{GatherError, HostAddresses, SSH_PORT, Stage, stages_for_platform};

/// Load the state visible to `stage`: its own state file plus those of the
/// stages preceding it in the platform sequence, which share `dir`.
///
/// Returns `Ok(None)` when none of the files exist yet.
///
/// # Errors
///
/// Returns an error if any existing state file is unreadable or malformed.
pub fn visible_state(
    reader: &impl StateReader,
    dir: &Path,
    stage: &Stage,
) -> Result<Option<StateDocument>> {
    let sequence = stages_for_platform(stage.platform);
    let upto = sequence
        .iter()
        .position(|s| s.name == stage.name)
        .map_or_else(|| vec![stage.clone()], |i| sequence[..=i].to_vec());

    let mut merged: Option<StateDocument> = None;
    for s in &upto {
        let Some(doc) = reader
            .read_state(dir, &s.state_file)
            .with_context(|| format!("reading state of stage {}", s.name))?
        else {
            continue;
        };
        match merged.as_mut() {
            Some(m) => m.absorb(doc),
            None => merged = Some(doc),
        }
    }
    Ok(merged)
}

/// Extract the bootstrap and control-plane addresses for `stage`.
///
/// Dispatches to the stage's custom strategy, else the platform default.
/// Stages without any strategy yield [`HostAddresses::empty`].
/// Control-plane entries that could not be determined are empty strings
/// and listed in [`HostAddresses::failures`]; they never fail the call.
///
/// # Errors
///
/// Returns an error if state is missing or unreadable, the bootstrap
/// address cannot be determined, or the control-plane resource is absent.
pub async fn extract_host_addresses<R: AddressResolver>(
    reader: &impl StateReader,
    dir: &Path,
    stage: &Stage,
    ctx: &GatherContext<'_, R>,
) -> Result<HostAddresses> {
    let Some(strategy) = stage.gather_strategy() else {
        tracing::debug!(stage = %stage.name, "stage has no gather strategy");
        return Ok(HostAddresses::empty());
    };

    let state = if gather::reads_state(strategy) {
        visible_state(reader, dir, stage)?
            .ok_or_else(|| GatherError::NoState(dir.to_path_buf()))?
    } else {
        StateDocument::default()
    };

    let bootstrap = gather::bootstrap_ip(strategy, &state, ctx)
        .await
        .with_context(|| format!("gathering bootstrap address for stage {}", stage.name))?;

    let control_plane = gather::control_plane_ips(strategy, &state, ctx)
        .await
        .with_context(|| format!("gathering control-plane addresses for stage {}", stage.name))?;

    if control_plane.ips.len() != ctx.cluster.control_plane_replicas
        && !control_plane.ips.is_empty()
    {
        tracing::warn!(
            found = control_plane.ips.len(),
            expected = ctx.cluster.control_plane_replicas,
            "control-plane instance count differs from the configured replicas"
        );
    }
    for failure in &control_plane.failures {
        tracing::warn!(index = failure.index, reason = %failure.reason, "control-plane address missing");
    }

    Ok(HostAddresses {
        bootstrap,
        ssh_port: SSH_PORT,
        control_plane: control_plane.ips,
        failures: control_plane.failures,
    })
}
