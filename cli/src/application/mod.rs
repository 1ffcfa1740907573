//! Application layer — port trait definitions and use-case orchestration.
//!
//! This module depends only on `crate::domain` and the `stagehand_common`
//! state model — never on `crate::infra`, `crate::commands`, or
//! `crate::output`.

pub mod ports;
pub mod services;

pub use ports::{
    AddressResolver, CommandRunner, ConfigStore, CredentialSource, EngineRunner,
    ProgressReporter, StateReader,
};
