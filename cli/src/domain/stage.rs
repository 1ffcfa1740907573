//! Provisioning stages and the per-platform stage sequence.
//!
//! A stage is a static configuration record: its name fixes the state and
//! outputs file names, and its destroy policy decides whether tearing down
//! the bootstrap host also tears the stage down.

use serde::Serialize;

use crate::domain::error::StageError;
use crate::domain::platform::Platform;

/// Variables file written into every stage directory before `apply`.
pub const DEFAULT_VARS_FILE: &str = "terraform.tfvars.json";

/// Module holding the bootstrap host's resources.
pub const BOOTSTRAP_MODULE: &str = "module.bootstrap";

/// Name of the single stage used by platforms not yet split into stages.
pub const LEGACY_STAGE: &str = "terraform";

/// Whether a stage is torn down together with the bootstrap host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DestroyPolicy {
    /// Destroy scoped to the bootstrap module once the cluster is up.
    WithBootstrap,
    /// Lives as long as the cluster; never destroyed with the bootstrap host.
    Retained,
}

/// Backend-specific convention for reading host addresses out of state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GatherStrategy {
    Aws,
    Azure,
    Gcp,
    IbmCloud,
    Libvirt,
    OpenStack,
    Ovirt,
    VSphere,
    BareMetal,
    /// Backend has no convention; extraction yields an empty result.
    Unsupported,
}

impl GatherStrategy {
    /// Default strategy for a platform.
    #[must_use]
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Aws => GatherStrategy::Aws,
            Platform::Azure => GatherStrategy::Azure,
            Platform::Gcp => GatherStrategy::Gcp,
            Platform::IbmCloud => GatherStrategy::IbmCloud,
            Platform::Libvirt => GatherStrategy::Libvirt,
            Platform::OpenStack => GatherStrategy::OpenStack,
            Platform::Ovirt => GatherStrategy::Ovirt,
            Platform::VSphere => GatherStrategy::VSphere,
            Platform::BareMetal => GatherStrategy::BareMetal,
            Platform::PowerVs | Platform::None => GatherStrategy::Unsupported,
        }
    }
}

/// One named, ordered unit of provisioning work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stage {
    pub platform: Platform,
    pub name: String,
    pub state_file: String,
    pub outputs_file: String,
    pub vars_file: String,
    pub destroy_policy: DestroyPolicy,
    /// Overrides the platform's default gather strategy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gather: Option<GatherStrategy>,
    /// Single-stage layout predating the split; has no gather strategy.
    pub legacy: bool,
}

impl Stage {
    /// A stage named `name` with `<name>.tfstate` and `<name>.tfvars.json`.
    #[must_use]
    pub fn new(platform: Platform, name: &str, destroy_policy: DestroyPolicy) -> Self {
        Self {
            platform,
            name: name.to_string(),
            state_file: format!("{name}.tfstate"),
            outputs_file: format!("{name}.tfvars.json"),
            vars_file: DEFAULT_VARS_FILE.to_string(),
            destroy_policy,
            gather: None,
            legacy: false,
        }
    }

    /// The monolithic stage of a platform not yet split into stages.
    #[must_use]
    pub fn legacy(platform: Platform) -> Self {
        Self {
            platform,
            name: LEGACY_STAGE.to_string(),
            state_file: "terraform.tfstate".to_string(),
            outputs_file: "outputs.tfvars.json".to_string(),
            vars_file: DEFAULT_VARS_FILE.to_string(),
            destroy_policy: DestroyPolicy::Retained,
            gather: None,
            legacy: true,
        }
    }

    #[must_use]
    pub fn with_gather(mut self, strategy: GatherStrategy) -> Self {
        self.gather = Some(strategy);
        self
    }

    #[must_use]
    pub fn destroy_with_bootstrap(&self) -> bool {
        self.destroy_policy == DestroyPolicy::WithBootstrap
    }

    /// Strategy used to extract host addresses after this stage applies.
    ///
    /// Legacy stages have none: the caller receives an empty result.
    #[must_use]
    pub fn gather_strategy(&self) -> Option<GatherStrategy> {
        if let Some(custom) = self.gather {
            return Some(custom);
        }
        if self.legacy {
            return None;
        }
        Some(GatherStrategy::for_platform(self.platform))
    }

    /// Arguments for `init`.
    #[must_use]
    pub fn init_args(&self) -> Vec<String> {
        vec!["init".into(), "-input=false".into(), "-no-color".into()]
    }

    /// Arguments for `apply`, followed by `extra`.
    #[must_use]
    pub fn apply_args(&self, extra: &[String]) -> Vec<String> {
        let mut args = vec![
            "apply".to_string(),
            "-auto-approve".to_string(),
            "-input=false".to_string(),
            "-no-color".to_string(),
            format!("-state={}", self.state_file),
            format!("-var-file={}", self.vars_file),
        ];
        args.extend(extra.iter().cloned());
        args
    }

    /// Arguments for `destroy`, followed by `extra`.
    ///
    /// Stages destroyed with the bootstrap host are restricted to the
    /// bootstrap module so control-plane resources survive.
    #[must_use]
    pub fn destroy_args(&self, extra: &[String]) -> Vec<String> {
        let mut args = vec![
            "destroy".to_string(),
            "-auto-approve".to_string(),
            "-input=false".to_string(),
            "-no-color".to_string(),
            format!("-state={}", self.state_file),
            format!("-var-file={}", self.vars_file),
        ];
        if self.destroy_with_bootstrap() {
            args.push(format!("-target={BOOTSTRAP_MODULE}"));
        }
        args.extend(extra.iter().cloned());
        args
    }
}

// ── Sequencer ─────────────────────────────────────────────────────────────────

/// Stages for `platform` in creation order.
#[must_use]
pub fn stages_for_platform(platform: Platform) -> Vec<Stage> {
    match platform {
        Platform::Aws
        | Platform::Azure
        | Platform::Gcp
        | Platform::IbmCloud
        | Platform::OpenStack
        | Platform::Ovirt
        | Platform::VSphere => vec![
            Stage::new(platform, "cluster", DestroyPolicy::Retained),
            Stage::new(platform, "bootstrap", DestroyPolicy::WithBootstrap),
        ],
        Platform::Libvirt | Platform::BareMetal => vec![
            Stage::new(platform, "masters", DestroyPolicy::Retained),
            Stage::new(platform, "bootstrap", DestroyPolicy::WithBootstrap),
        ],
        Platform::PowerVs => vec![Stage::legacy(platform)],
        Platform::None => Vec::new(),
    }
}

/// Stages torn down with the bootstrap host, in sequence order.
///
/// This filters; it never reorders.
#[must_use]
pub fn bootstrap_destroy_stages(platform: Platform) -> Vec<Stage> {
    stages_for_platform(platform)
        .into_iter()
        .filter(Stage::destroy_with_bootstrap)
        .collect()
}

/// Look up one stage of `platform` by name.
///
/// # Errors
///
/// Returns [`StageError::NotFound`] if the platform has no such stage.
pub fn find_stage(platform: Platform, name: &str) -> Result<Stage, StageError> {
    stages_for_platform(platform)
        .into_iter()
        .find(|s| s.name == name)
        .ok_or_else(|| StageError::NotFound {
            platform: platform.to_string(),
            name: name.to_string(),
        })
}

/// The stage whose state holds the bootstrap host, i.e. the last stage that
/// is destroyed with it, or the legacy stage.
///
/// # Errors
///
/// Returns [`StageError::NoStages`] for platforms without stages.
pub fn address_stage(platform: Platform) -> Result<Stage, StageError> {
    let stages = stages_for_platform(platform);
    stages
        .iter()
        .rfind(|s| s.destroy_with_bootstrap())
        .or_else(|| stages.last())
        .cloned()
        .ok_or_else(|| StageError::NoStages(platform.to_string()))
}
