//! State document model (format version 4) and resource lookup.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::attribute::AttributeValue;
use crate::error::{AttributeError, StateError};

/// Oldest state format this crate understands. Earlier formats nest
/// resources under a `modules` array instead of a flat `resources` list.
pub const MIN_STATE_VERSION: u64 = 4;

/// A snapshot of the infrastructure managed by one engine working directory.
///
/// `lineage` and `serial` identify the snapshot for display only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateDocument {
    pub version: u64,
    #[serde(default)]
    pub terraform_version: String,
    #[serde(default)]
    pub serial: u64,
    #[serde(default)]
    pub lineage: String,
    #[serde(default)]
    pub outputs: BTreeMap<String, StateOutput>,
    #[serde(default)]
    pub resources: Vec<StateResource>,
}

/// A root-module output value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateOutput {
    pub value: AttributeValue,
    #[serde(default)]
    pub sensitive: bool,
}

/// Every instance of one resource block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateResource {
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Module path such as `module.bootstrap`. Absent for the root module.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub instances: Vec<ResourceInstance>,
}

/// One deployed object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceInstance {
    /// `count` index (number) or `for_each` key (string). Absent for singletons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_key: Option<serde_json::Value>,
    #[serde(default)]
    pub schema_version: u64,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
}

fn default_mode() -> String {
    "managed".to_string()
}

/// Load the state document at `path`.
///
/// A missing file is not an error: it means the engine has not applied
/// anything yet, and `Ok(None)` is returned.
///
/// # Errors
///
/// Returns [`StateError::Read`] if the file exists but cannot be read,
/// [`StateError::Parse`] if it is not a valid document, and
/// [`StateError::UnsupportedVersion`] for pre-v4 formats.
pub fn load_state(path: &Path) -> Result<Option<StateDocument>, StateError> {
    let content = match std::fs::read(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StateError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let doc: StateDocument =
        serde_json::from_slice(&content).map_err(|source| StateError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    if doc.version < MIN_STATE_VERSION {
        return Err(StateError::UnsupportedVersion(doc.version));
    }
    Ok(Some(doc))
}

impl StateDocument {
    /// Find a managed resource by module path, type and name.
    ///
    /// Matching is exact. An empty `module` matches resources of the root
    /// module only, not resources of every module.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::ResourceNotFound`] when nothing matches.
    pub fn lookup_resource(
        &self,
        module: &str,
        resource_type: &str,
        name: &str,
    ) -> Result<&StateResource, StateError> {
        self.resources
            .iter()
            .filter(|r| r.mode == "managed")
            .find(|r| {
                r.module.as_deref().unwrap_or_default() == module
                    && r.resource_type == resource_type
                    && r.name == name
            })
            .ok_or_else(|| StateError::ResourceNotFound {
                address: resource_address(module, resource_type, name),
            })
    }

    /// Append the resources and outputs of another document.
    ///
    /// Used to view the state files of sibling stages sharing one directory
    /// as a single document. Their resource addresses never overlap because
    /// each stage manages its own modules; outputs from `other` win.
    pub fn absorb(&mut self, other: StateDocument) {
        self.version = self.version.max(other.version);
        self.resources.extend(other.resources);
        self.outputs.extend(other.outputs);
    }

    /// Number of resource instances recorded, across all resources.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.resources.iter().map(|r| r.instances.len()).sum()
    }
}

impl StateResource {
    /// Full address, e.g. `module.bootstrap.aws_instance.bootstrap`.
    #[must_use]
    pub fn address(&self) -> String {
        resource_address(
            self.module.as_deref().unwrap_or_default(),
            &self.resource_type,
            &self.name,
        )
    }

    /// Instances sorted by numeric `index_key`; non-numeric keys keep their
    /// recorded order after the numbered ones.
    #[must_use]
    pub fn instances_in_index_order(&self) -> Vec<&ResourceInstance> {
        let mut instances: Vec<&ResourceInstance> = self.instances.iter().collect();
        instances.sort_by_key(|i| {
            i.index_key
                .as_ref()
                .and_then(serde_json::Value::as_u64)
                .unwrap_or(u64::MAX)
        });
        instances
    }
}

impl ResourceInstance {
    /// Resolve a dotted attribute path against this instance.
    ///
    /// # Errors
    ///
    /// See [`AttributeValue::lookup`].
    pub fn attribute(&self, path: &str) -> Result<&AttributeValue, AttributeError> {
        let (head, rest) = path.split_once('.').unwrap_or((path, ""));
        let root = self
            .attributes
            .get(head)
            .ok_or_else(|| AttributeError::Missing {
                path: head.to_string(),
            })?;
        if rest.is_empty() {
            return Ok(root);
        }
        root.lookup(rest).map_err(|e| prefix_path(head, e))
    }

    /// Resolve a dotted path to a non-empty string.
    ///
    /// # Errors
    ///
    /// Fails when the path is missing, not a string, or empty.
    pub fn string_at(&self, path: &str) -> Result<&str, AttributeError> {
        self.attribute(path)?.as_non_empty_str(path)
    }
}

fn prefix_path(head: &str, err: AttributeError) -> AttributeError {
    match err {
        AttributeError::Missing { path } => AttributeError::Missing {
            path: format!("{head}.{path}"),
        },
        AttributeError::WrongType {
            path,
            expected,
            found,
        } => AttributeError::WrongType {
            path: format!("{head}.{path}"),
            expected,
            found,
        },
        AttributeError::Empty { path } => AttributeError::Empty {
            path: format!("{head}.{path}"),
        },
    }
}

fn resource_address(module: &str, resource_type: &str, name: &str) -> String {
    if module.is_empty() {
        format!("{resource_type}.{name}")
    } else {
        format!("{module}.{resource_type}.{name}")
    }
}
