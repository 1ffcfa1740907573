//! Domain types for stagehand configuration.
//!
//! Pure types only — no I/O, no async, no filesystem access.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::platform::Platform;

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_ENGINE_BINARY: &str = "terraform";
pub const DEFAULT_ADDRESS_WAIT_SECS: u64 = 60;

// ── Tool config ──────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.stagehand/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StagehandConfig {
    pub engine: EngineConfig,
    pub gather: GatherConfig,
    /// External command used to resolve managed-object references to IPs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolver: Option<ResolverConfig>,
}

/// Engine binary and run limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Binary name searched next to the installer, in the current
    /// directory, then on `PATH`.
    pub binary: String,
    /// Stop waiting for a run after this many seconds. The run itself is
    /// never killed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_timeout_secs: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            binary: DEFAULT_ENGINE_BINARY.to_string(),
            run_timeout_secs: None,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn run_timeout(&self) -> Option<Duration> {
        self.run_timeout_secs.map(Duration::from_secs)
    }
}

/// Address extraction limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatherConfig {
    /// Upper bound on each wait for a hypervisor-reported address.
    pub address_wait_secs: u64,
}

impl Default for GatherConfig {
    fn default() -> Self {
        Self {
            address_wait_secs: DEFAULT_ADDRESS_WAIT_SECS,
        }
    }
}

impl GatherConfig {
    #[must_use]
    pub fn address_wait(&self) -> Duration {
        Duration::from_secs(self.address_wait_secs)
    }
}

/// `program args... <reference>` must print the address on stdout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

// ── Cluster description ──────────────────────────────────────────────────────

/// The subset of the cluster description needed to interpret state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    pub platform: Platform,
    #[serde(default = "default_control_plane_replicas")]
    pub control_plane_replicas: usize,
    /// Bare-metal hosts are not created by the engine; their addresses come
    /// from here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baremetal: Option<BareMetalConfig>,
}

fn default_control_plane_replicas() -> usize {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BareMetalConfig {
    #[serde(default)]
    pub bootstrap_ip: Option<String>,
    #[serde(default)]
    pub hosts: Vec<BareMetalHost>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BareMetalHost {
    pub name: String,
    #[serde(default = "default_host_role")]
    pub role: String,
    pub ip: String,
}

fn default_host_role() -> String {
    "master".to_string()
}

// ── Unit tests ───────────────────────────────────────────────────────────────
