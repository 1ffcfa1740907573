//! Infrastructure implementation of the `CredentialSource` port.
//!
//! Credentials live in a flat YAML map of environment variable names to
//! values, e.g. `AWS_ACCESS_KEY_ID: AKIA...`. They reach the engine as
//! overrides, never through the ambient environment.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::CredentialSource;

/// Credentials read from a YAML file.
pub struct YamlCredentialsFile {
    path: PathBuf,
}

impl YamlCredentialsFile {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl CredentialSource for YamlCredentialsFile {
    fn environment(&self) -> Result<BTreeMap<String, String>> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("cannot read {}", self.path.display()))?;
        let vars: BTreeMap<String, String> = serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", self.path.display()))?;
        if let Some(bad) = vars.keys().find(|k| k.is_empty() || k.contains('=')) {
            anyhow::bail!("invalid variable name '{bad}' in {}", self.path.display());
        }
        Ok(vars)
    }
}
