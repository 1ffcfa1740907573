//! Target platforms and their string names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

/// A cloud or virtualization backend the cluster can be provisioned on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Aws,
    Azure,
    Gcp,
    IbmCloud,
    Libvirt,
    OpenStack,
    Ovirt,
    VSphere,
    BareMetal,
    PowerVs,
    None,
}

impl Platform {
    pub const ALL: &'static [Platform] = &[
        Platform::Aws,
        Platform::Azure,
        Platform::Gcp,
        Platform::IbmCloud,
        Platform::Libvirt,
        Platform::OpenStack,
        Platform::Ovirt,
        Platform::VSphere,
        Platform::BareMetal,
        Platform::PowerVs,
        Platform::None,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Aws => "aws",
            Platform::Azure => "azure",
            Platform::Gcp => "gcp",
            Platform::IbmCloud => "ibmcloud",
            Platform::Libvirt => "libvirt",
            Platform::OpenStack => "openstack",
            Platform::Ovirt => "ovirt",
            Platform::VSphere => "vsphere",
            Platform::BareMetal => "baremetal",
            Platform::PowerVs => "powervs",
            Platform::None => "none",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownPlatform {
                name: s.to_string(),
                valid: Platform::ALL
                    .iter()
                    .map(|p| p.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}
