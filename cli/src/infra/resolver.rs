//! Infrastructure implementations of the `AddressResolver` port.
//!
//! Hypervisor-backed platforms (vSphere, oVirt) record only a VM reference
//! in state. The address is looked up by an external helper program named
//! in the `resolver` config section, invoked as `<program> <args...> <ref>`.
//! The first non-empty line of its stdout must be an IP address.

use std::net::IpAddr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{AddressResolver, CommandRunner};
use crate::domain::config::ResolverConfig;
use crate::infra::command_runner::TokioCommandRunner;

/// Extra time the helper process gets beyond the address wait, so the
/// caller's bounded wait expires before the process is killed.
const RESOLVER_SLACK: Duration = Duration::from_secs(5);

/// Resolves references by running the configured helper program.
pub struct CommandAddressResolver<R: CommandRunner> {
    runner: R,
    program: String,
    args: Vec<String>,
}

impl<R: CommandRunner> CommandAddressResolver<R> {
    #[must_use]
    pub fn new(runner: R, config: &ResolverConfig) -> Self {
        Self {
            runner,
            program: config.program.clone(),
            args: config.args.clone(),
        }
    }
}

impl CommandAddressResolver<TokioCommandRunner> {
    /// Resolver backed by a real helper process, killed if it outlives `wait`.
    #[must_use]
    pub fn from_config(config: &ResolverConfig, wait: Duration) -> Self {
        Self::new(TokioCommandRunner::new(wait + RESOLVER_SLACK), config)
    }
}

impl<R: CommandRunner> AddressResolver for CommandAddressResolver<R> {
    async fn resolve(&self, reference: &str) -> Result<String> {
        let mut args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        args.push(reference);

        tracing::debug!(program = %self.program, %reference, "resolving address");
        let output = self
            .runner
            .run(&self.program, &args)
            .await
            .with_context(|| format!("resolving address of {reference}"))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "{} failed for {reference}: {}",
                self.program,
                stderr.trim()
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let line = stdout
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .ok_or_else(|| anyhow::anyhow!("{} printed no address for {reference}", self.program))?;
        line.parse::<IpAddr>()
            .with_context(|| format!("{} printed '{line}' for {reference}", self.program))?;
        Ok(line.to_string())
    }
}

/// Stand-in used when no resolver is configured.
pub struct NoAddressResolver;

impl AddressResolver for NoAddressResolver {
    async fn resolve(&self, reference: &str) -> Result<String> {
        anyhow::bail!(
            "cannot resolve the address of {reference}: no resolver configured (set resolver.program)"
        )
    }
}
