//! Infrastructure implementation of the `StateReader` port.

use std::path::Path;

use anyhow::Result;
use stagehand_common::{StateDocument, load_state};

use crate::application::ports::StateReader;

/// Reads engine state files from the local filesystem.
pub struct FsStateReader;

impl StateReader for FsStateReader {
    fn read_state(&self, dir: &Path, state_file: &str) -> Result<Option<StateDocument>> {
        let path = dir.join(state_file);
        let state = load_state(&path)?;
        if state.is_none() {
            tracing::debug!(path = %path.display(), "no state file");
        }
        Ok(state)
    }
}
