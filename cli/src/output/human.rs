//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;

use crate::domain::{DestroyPolicy, HostAddresses, Platform, RunId, RunStatus, Stage};
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the stage sequence of a platform.
    pub fn render_stages(&self, platform: Platform, stages: &[Stage]) {
        if stages.is_empty() {
            self.ctx.info(&format!("platform {platform} has no provisioning stages"));
            return;
        }
        self.ctx.header(&format!("Stages for {platform}:"));
        for (i, stage) in stages.iter().enumerate() {
            if self.ctx.quiet {
                continue;
            }
            let policy = match stage.destroy_policy {
                DestroyPolicy::WithBootstrap => "destroyed with bootstrap"
                    .style(self.ctx.styles.bootstrap)
                    .to_string(),
                DestroyPolicy::Retained => "retained".style(self.ctx.styles.dim).to_string(),
            };
            println!(
                "  {}. {}  {}  {policy}",
                i + 1,
                stage.name.style(self.ctx.styles.bold),
                stage.state_file.style(self.ctx.styles.dim),
            );
        }
    }

    /// Render extracted host addresses.
    pub fn render_addresses(&self, addresses: &HostAddresses) {
        if addresses.bootstrap.is_empty() && addresses.control_plane.is_empty() {
            self.ctx.info("no addresses: the stage has no gather strategy");
            return;
        }
        self.ctx.kv("Bootstrap:", &addresses.bootstrap);
        self.ctx.kv("SSH port:", &addresses.ssh_port.to_string());
        self.ctx.header("Control plane:");
        for (i, ip) in addresses.control_plane.iter().enumerate() {
            let shown = if ip.is_empty() { "<unknown>" } else { ip.as_str() };
            self.ctx.kv(&format!("[{i}]"), shown);
        }
        for failure in &addresses.failures {
            self.ctx
                .warn(&format!("instance {}: {}", failure.index, failure.reason));
        }
    }

    /// Render the status of one run.
    pub fn render_status(&self, run: RunId, status: &RunStatus) {
        let label = format!("run {run}");
        match status {
            RunStatus::Running => self.ctx.info(&format!("{label}: running")),
            RunStatus::Succeeded => self.ctx.success(&format!("{label}: succeeded")),
            RunStatus::Failed(reason) => self.ctx.error(&format!("{label}: failed ({reason})")),
            RunStatus::NotFound => self.ctx.warn(&format!("{label}: not found")),
        }
    }

    /// Render the runs performed by a command.
    pub fn render_runs(&self, action: &str, runs: &[RunId]) {
        if runs.is_empty() {
            return;
        }
        let ids: Vec<String> = runs.iter().map(ToString::to_string).collect();
        self.ctx.kv(&format!("{action} runs:"), &ids.join(", "));
    }
}
