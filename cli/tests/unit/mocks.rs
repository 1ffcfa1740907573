//! Shared mock infrastructure for unit tests.
//!
//! Provides in-memory implementations of the application ports so service
//! tests never spawn the engine or touch stage directories.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use stagehand_cli::application::ports::{
    AddressResolver, EngineRunner, ProgressReporter, StateReader,
};
use stagehand_cli::domain::RunId;
use stagehand_common::StateDocument;

// ── Engine ────────────────────────────────────────────────────────────────────

/// Records every engine invocation; fails the call whose first argument
/// matches `fail_on` (e.g. `"apply"`).
pub struct RecordingRunner {
    dir: PathBuf,
    pub calls: RefCell<Vec<Vec<String>>>,
    fail_on: Option<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self {
            dir: PathBuf::from("/work/cluster"),
            calls: RefCell::new(Vec::new()),
            fail_on: None,
        }
    }

    pub fn failing_on(command: &str) -> Self {
        Self {
            fail_on: Some(command.to_string()),
            ..Self::new()
        }
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|args| args.first().cloned().unwrap_or_default())
            .collect()
    }
}

impl EngineRunner for RecordingRunner {
    fn working_dir(&self) -> &Path {
        &self.dir
    }

    async fn run_to_completion(&self, args: &[String]) -> Result<RunId> {
        self.calls.borrow_mut().push(args.to_vec());
        let run = RunId(1000 + u32::try_from(self.calls.borrow().len()).unwrap_or(0));
        if self.fail_on.as_deref() == args.first().map(String::as_str) {
            anyhow::bail!("run {run} failed: exit status: 1");
        }
        Ok(run)
    }
}

// ── State ─────────────────────────────────────────────────────────────────────

/// State documents keyed by file name; the directory is ignored.
#[derive(Default)]
pub struct MemoryStates {
    docs: HashMap<String, StateDocument>,
    pub reads: RefCell<Vec<String>>,
}

impl MemoryStates {
    pub fn with(mut self, file: &str, doc: StateDocument) -> Self {
        self.docs.insert(file.to_string(), doc);
        self
    }
}

impl StateReader for MemoryStates {
    fn read_state(&self, _dir: &Path, state_file: &str) -> Result<Option<StateDocument>> {
        self.reads.borrow_mut().push(state_file.to_string());
        Ok(self.docs.get(state_file).cloned())
    }
}

// ── Resolver ──────────────────────────────────────────────────────────────────

/// Resolves references from a fixed table; unknown references fail.
#[derive(Default)]
pub struct TableResolver {
    pub table: HashMap<String, String>,
}

impl TableResolver {
    pub fn with(mut self, reference: &str, ip: &str) -> Self {
        self.table.insert(reference.to_string(), ip.to_string());
        self
    }
}

impl AddressResolver for TableResolver {
    async fn resolve(&self, reference: &str) -> Result<String> {
        self.table
            .get(reference)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no lease for {reference}"))
    }
}

// ── Progress ──────────────────────────────────────────────────────────────────

/// Collects progress messages as `"step: ..."`, `"success: ..."`, `"warn: ..."`.
#[derive(Default)]
pub struct RecordingReporter {
    pub messages: RefCell<Vec<String>>,
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.messages.borrow_mut().push(format!("step: {message}"));
    }

    fn success(&self, message: &str) {
        self.messages.borrow_mut().push(format!("success: {message}"));
    }

    fn warn(&self, message: &str) {
        self.messages.borrow_mut().push(format!("warn: {message}"));
    }
}
