//! JSON output helpers.
//!
//! Every `--json` code path prints one pretty-printed document to stdout.
//! Failures use the error object from [`format_error`].

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;

use crate::domain::{HostAddresses, Platform, RunId, RunStatus, Stage};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Machine-readable renderer.
pub struct JsonRenderer;

impl JsonRenderer {
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_stages(&self, platform: Platform, stages: &[Stage]) -> Result<()> {
        print(&json!({ "platform": platform, "stages": stages }))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_addresses(&self, addresses: &HostAddresses) -> Result<()> {
        print(addresses)
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_status(&self, run: RunId, status: &RunStatus) -> Result<()> {
        let mut obj = serde_json::to_value(status).context("JSON serialization failed")?;
        if let Some(map) = obj.as_object_mut() {
            map.insert("run".to_string(), json!(run));
        }
        print(&obj)
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_runs(&self, action: &str, runs: &[RunId]) -> Result<()> {
        print(&json!({ "action": action, "runs": runs }))
    }
}

fn print<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("JSON serialization failed")?
    );
    Ok(())
}
