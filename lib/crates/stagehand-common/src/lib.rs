//! Read-only model of the state documents persisted by the IaC engine.
//!
//! Nothing in this crate writes state. Documents are loaded once per
//! extraction request and queried by resource address.

pub mod attribute;
pub mod error;
pub mod state;

pub use attribute::AttributeValue;
pub use error::{AttributeError, StateError};
pub use state::{ResourceInstance, StateDocument, StateResource, load_state};
