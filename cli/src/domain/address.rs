//! Host address results produced by the gather strategies.

use serde::Serialize;

use crate::domain::error::GatherError;

/// Port used to reach the bootstrap host over SSH.
pub const SSH_PORT: u16 = 22;

/// Addresses of the hosts provisioned by a stage.
///
/// `control_plane` keeps one entry per provisioned control-plane instance in
/// index order. Entries whose extraction failed are empty strings and are
/// listed in `failures`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostAddresses {
    pub bootstrap: String,
    pub ssh_port: u16,
    pub control_plane: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<InstanceFailure>,
}

impl HostAddresses {
    /// Result for stages and platforms without an extraction strategy.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            bootstrap: String::new(),
            ssh_port: SSH_PORT,
            control_plane: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Aggregate error for the control-plane entries that could not be filled.
    #[must_use]
    pub fn control_plane_error(&self) -> Option<GatherError> {
        aggregate_failures(&self.failures)
    }
}

/// One error naming every failed instance, or `None` when all succeeded.
fn aggregate_failures(failures: &[InstanceFailure]) -> Option<GatherError> {
    if failures.is_empty() {
        None
    } else {
        Some(GatherError::Instances(failures.to_vec()))
    }
}

/// A control-plane instance whose address could not be determined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceFailure {
    pub index: usize,
    pub reason: String,
}

/// Best-effort control-plane addresses plus every per-instance failure.
#[derive(Debug, Default)]
pub struct ControlPlaneIps {
    pub ips: Vec<String>,
    pub failures: Vec<InstanceFailure>,
}

impl ControlPlaneIps {
    /// Record one instance outcome, keeping index alignment on failure.
    pub fn push<E: std::fmt::Display>(&mut self, outcome: Result<String, E>) {
        match outcome {
            Ok(ip) => self.ips.push(ip),
            Err(e) => {
                self.failures.push(InstanceFailure {
                    index: self.ips.len(),
                    reason: e.to_string(),
                });
                self.ips.push(String::new());
            }
        }
    }

    /// The aggregate error, if any instance failed.
    #[must_use]
    pub fn error(&self) -> Option<GatherError> {
        aggregate_failures(&self.failures)
    }

    /// Split into the partial result and the aggregate error.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Option<GatherError>) {
        let err = self.error();
        (self.ips, err)
    }
}
