//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: engine process
//! supervision, binary lookup, archiving, state and config files, and
//! helper process execution.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod archive;
pub mod binary;
pub mod command_runner;
pub mod config;
pub mod credentials;
pub mod executor;
pub mod resolver;
pub mod state;
