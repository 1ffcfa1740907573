//! Domain layer — pure types, rules and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod address;
pub mod config;
pub mod error;
pub mod platform;
pub mod run;
pub mod stage;

pub use address::{ControlPlaneIps, HostAddresses, InstanceFailure, SSH_PORT};
pub use config::{ClusterConfig, StagehandConfig};
pub use error::{ConfigError, ExecutorError, GatherError, StageError};
pub use platform::Platform;
pub use run::{RunId, RunStatus};
pub use stage::{
    DestroyPolicy, GatherStrategy, Stage, bootstrap_destroy_stages, find_stage,
    stages_for_platform,
};
