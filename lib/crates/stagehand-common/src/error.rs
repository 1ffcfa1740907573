use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or querying a state document.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("cannot read state file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse state file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported state format version {0} (expected 4)")]
    UnsupportedVersion(u64),

    #[error("resource {address} not found in state")]
    ResourceNotFound { address: String },
}

/// Errors raised by the fallible accessors on [`crate::AttributeValue`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeError {
    #[error("attribute {path} is not set")]
    Missing { path: String },

    #[error("attribute {path} is a {found}, expected a {expected}")]
    WrongType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("attribute {path} is empty")]
    Empty { path: String },
}
