//! Typed view over the untyped attribute maps stored per resource instance.
//!
//! Attribute shapes differ per provider and per provider version, so every
//! accessor is fallible: a malformed state yields an [`AttributeError`]
//! naming the offending path instead of a panic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AttributeError;

/// One attribute value as recorded by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<AttributeValue>),
    Map(BTreeMap<String, AttributeValue>),
}

impl AttributeValue {
    /// Short type name used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    /// Borrow the value as a string slice.
    ///
    /// # Errors
    ///
    /// Returns [`AttributeError::Missing`] for `null` and
    /// [`AttributeError::WrongType`] for any other non-string value.
    pub fn as_str(&self, path: &str) -> Result<&str, AttributeError> {
        match self {
            Self::String(s) => Ok(s),
            Self::Null => Err(AttributeError::Missing {
                path: path.to_string(),
            }),
            other => Err(wrong_type(path, "string", other)),
        }
    }

    /// Like [`Self::as_str`] but also rejects the empty string.
    ///
    /// # Errors
    ///
    /// Returns [`AttributeError::Empty`] when the string has no content.
    pub fn as_non_empty_str(&self, path: &str) -> Result<&str, AttributeError> {
        let s = self.as_str(path)?;
        if s.is_empty() {
            return Err(AttributeError::Empty {
                path: path.to_string(),
            });
        }
        Ok(s)
    }

    /// Collect a list of strings.
    ///
    /// # Errors
    ///
    /// Fails if the value is not a list or any element is not a string.
    pub fn as_string_slice(&self, path: &str) -> Result<Vec<String>, AttributeError> {
        self.as_list(path)?
            .iter()
            .enumerate()
            .map(|(i, v)| v.as_str(&format!("{path}.{i}")).map(str::to_string))
            .collect()
    }

    /// Borrow the value as a list.
    ///
    /// # Errors
    ///
    /// Fails if the value is not a list.
    pub fn as_list(&self, path: &str) -> Result<&[AttributeValue], AttributeError> {
        match self {
            Self::List(items) => Ok(items),
            Self::Null => Err(AttributeError::Missing {
                path: path.to_string(),
            }),
            other => Err(wrong_type(path, "list", other)),
        }
    }

    /// Borrow the value as a map.
    ///
    /// # Errors
    ///
    /// Fails if the value is not a map.
    pub fn as_map(&self, path: &str) -> Result<&BTreeMap<String, AttributeValue>, AttributeError> {
        match self {
            Self::Map(m) => Ok(m),
            Self::Null => Err(AttributeError::Missing {
                path: path.to_string(),
            }),
            other => Err(wrong_type(path, "map", other)),
        }
    }

    /// # Errors
    ///
    /// Fails if the value is not a bool.
    pub fn as_bool(&self, path: &str) -> Result<bool, AttributeError> {
        match self {
            Self::Bool(b) => Ok(*b),
            Self::Null => Err(AttributeError::Missing {
                path: path.to_string(),
            }),
            other => Err(wrong_type(path, "bool", other)),
        }
    }

    /// # Errors
    ///
    /// Fails if the value is not a number representable as `f64`.
    pub fn as_f64(&self, path: &str) -> Result<f64, AttributeError> {
        match self {
            Self::Number(n) => n.as_f64().ok_or_else(|| wrong_type(path, "number", self)),
            Self::Null => Err(AttributeError::Missing {
                path: path.to_string(),
            }),
            other => Err(wrong_type(path, "number", other)),
        }
    }

    /// Walk a dotted path such as `network_interface.0.addresses.0`.
    ///
    /// Numeric segments index into lists; all other segments index into maps.
    ///
    /// # Errors
    ///
    /// Returns [`AttributeError::Missing`] when a segment does not exist and
    /// [`AttributeError::WrongType`] when a segment cannot be applied to the
    /// value it lands on.
    pub fn lookup(&self, path: &str) -> Result<&AttributeValue, AttributeError> {
        let mut current = self;
        let mut walked = String::new();
        for segment in path.split('.').filter(|s| !s.is_empty()) {
            if !walked.is_empty() {
                walked.push('.');
            }
            walked.push_str(segment);
            current = match current {
                Self::Map(m) => m.get(segment).ok_or_else(|| AttributeError::Missing {
                    path: walked.clone(),
                })?,
                Self::List(items) => {
                    let idx: usize = segment
                        .parse()
                        .map_err(|_| wrong_type(&walked, "map", current))?;
                    items.get(idx).ok_or_else(|| AttributeError::Missing {
                        path: walked.clone(),
                    })?
                }
                Self::Null => {
                    return Err(AttributeError::Missing { path: walked });
                }
                other => return Err(wrong_type(&walked, "map", other)),
            };
        }
        Ok(current)
    }
}

fn wrong_type(path: &str, expected: &'static str, found: &AttributeValue) -> AttributeError {
    AttributeError::WrongType {
        path: path.to_string(),
        expected,
        found: found.kind(),
    }
}

impl From<serde_json::Value> for AttributeValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<AttributeValue> for serde_json::Value {
    fn from(value: AttributeValue) -> Self {
        match value {
            AttributeValue::Null => Self::Null,
            AttributeValue::Bool(b) => Self::Bool(b),
            AttributeValue::Number(n) => Self::Number(n),
            AttributeValue::String(s) => Self::String(s),
            AttributeValue::List(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            AttributeValue::Map(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}
