//! Process executor for the IaC engine.
//!
//! One `Executor` owns one stage working directory. Each `execute` spawns
//! the engine, then drains its stdout and stderr into `logs/<pid>.log` and
//! waits for exit on a background task. When the exit is unsuccessful,
//! `logs/<pid>.fail` is written before the completion signal fires, so the
//! marker exists exactly for failed runs.
//!
//! Runs are never killed from here. Dropping a [`RunHandle`] stops waiting,
//! not the engine: an interrupted apply would leave state half-written.

use std::collections::{BTreeMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::{Context, Result};
use stagehand_common::{StateDocument, load_state};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::sync::oneshot;

use crate::application::ports::{CredentialSource, EngineRunner};
use crate::domain::error::ExecutorError;
use crate::domain::run::{LOG_DIR, RunId, RunStatus, engine_environment};
use crate::infra::{archive, binary};

/// Supervises engine runs inside one working directory.
pub struct Executor {
    binary: PathBuf,
    dir: PathBuf,
    log_dir: PathBuf,
    overrides: BTreeMap<String, String>,
    ambient: Vec<(String, String)>,
    run_timeout: Option<Duration>,
    /// Runs started by this executor whose supervisor has not finished.
    active: Arc<Mutex<HashSet<RunId>>>,
}

/// Caller side of a run: its id and the completion signal.
pub struct RunHandle {
    pub id: RunId,
    /// `None` on success, the failure reason otherwise.
    done: oneshot::Receiver<Option<String>>,
}

impl RunHandle {
    /// Wait for the run to finish and its log to be fully written.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError::RunFailed`] with the failure marker text when
    /// the engine exited unsuccessfully.
    pub async fn wait(self) -> Result<(), ExecutorError> {
        let run = self.id;
        match self.done.await {
            Ok(None) => Ok(()),
            Ok(Some(reason)) => Err(ExecutorError::RunFailed { run, reason }),
            Err(_) => Err(ExecutorError::Abandoned { run }),
        }
    }

    /// Like [`Self::wait`], giving up after `timeout`. The engine keeps
    /// running and still writes its log and marker.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError::WaitTimedOut`] when `timeout` elapses first.
    pub async fn wait_timeout(self, timeout: Duration) -> Result<(), ExecutorError> {
        let run = self.id;
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| ExecutorError::WaitTimedOut { run, timeout })?
    }
}

impl Executor {
    /// Locate `binary_name` and prepare `dir` for runs.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError::BinaryNotFound`] or
    /// [`ExecutorError::WorkingDirectory`]; nothing is spawned in either case.
    pub fn new(dir: impl Into<PathBuf>, binary_name: &str) -> Result<Self, ExecutorError> {
        let binary = binary::locate(binary_name)?;
        Self::with_binary(dir, binary)
    }

    /// Prepare `dir` for runs of an explicit engine binary.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError::WorkingDirectory`] if `dir/logs` cannot be created.
    pub fn with_binary(dir: impl Into<PathBuf>, binary: PathBuf) -> Result<Self, ExecutorError> {
        let dir = dir.into();
        let log_dir = dir.join(LOG_DIR);
        std::fs::create_dir_all(&log_dir).map_err(|source| ExecutorError::WorkingDirectory {
            path: log_dir.clone(),
            source,
        })?;
        tracing::debug!(binary = %binary.display(), dir = %dir.display(), "executor ready");
        Ok(Self {
            binary,
            dir,
            log_dir,
            overrides: BTreeMap::new(),
            ambient: ambient_environment(),
            run_timeout: None,
            active: Arc::new(Mutex::new(HashSet::new())),
        })
    }

    /// Replace the ambient environment snapshot the allow-list is applied to.
    #[must_use]
    pub fn with_ambient_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.ambient = vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    /// Stop waiting for runs after `timeout` in [`EngineRunner::run_to_completion`].
    #[must_use]
    pub fn with_run_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.run_timeout = timeout;
        self
    }

    #[must_use]
    pub fn working_dir(&self) -> &Path {
        &self.dir
    }

    /// Add environment overrides; the last value written for a key wins.
    pub fn add_environment_variables<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in vars {
            self.overrides.insert(k.into(), v.into());
        }
    }

    /// Add the environment produced by a credential source.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials cannot be read.
    pub fn add_credentials(&mut self, source: &impl CredentialSource) -> Result<()> {
        let vars = source.environment().context("reading credentials")?;
        tracing::debug!(count = vars.len(), "credential variables added");
        self.add_environment_variables(vars);
        Ok(())
    }

    /// Environment the engine will see.
    #[must_use]
    pub fn environment(&self) -> BTreeMap<String, String> {
        engine_environment(self.ambient.iter().cloned(), &self.overrides)
    }

    /// Spawn the engine with `args` and return as soon as it is running.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError::Spawn`] if the process cannot start; no log
    /// or marker is created in that case. Returns [`ExecutorError::LogFile`]
    /// carrying the run id if the log cannot be created; the run is still
    /// supervised, reports `Running` until it exits, and its marker is still
    /// written.
    pub async fn execute(&self, args: &[String]) -> Result<RunHandle, ExecutorError> {
        match self.start(args).await? {
            (handle, None) => Ok(handle),
            (_, Some(err)) => Err(err),
        }
    }

    /// Spawn and supervise a run. A log creation failure is returned next to
    /// the handle, since the engine is already running.
    async fn start(
        &self,
        args: &[String],
    ) -> Result<(RunHandle, Option<ExecutorError>), ExecutorError> {
        let mut child = tokio::process::Command::new(&self.binary)
            .args(args)
            .current_dir(&self.dir)
            .env_clear()
            .envs(self.environment())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ExecutorError::Spawn {
                binary: self.binary.display().to_string(),
                source,
            })?;

        let run = RunId(child.id().unwrap_or_default());
        tracing::debug!(%run, binary = %self.binary.display(), ?args, "engine started");
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(run);

        let log_path = self.log_dir.join(run.log_file_name());
        let marker_path = self.log_dir.join(run.failure_marker_name());
        let (log, log_err) = match tokio::fs::File::create(&log_path).await {
            Ok(f) => (Some(f), None),
            Err(source) => (
                None,
                Some(ExecutorError::LogFile {
                    run,
                    path: log_path.clone(),
                    source,
                }),
            ),
        };

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let active = Arc::clone(&self.active);
        let (done_tx, done) = oneshot::channel();

        tokio::spawn(async move {
            let (status, drained) = tokio::join!(child.wait(), drain_output(stdout, stderr, log));
            match drained {
                Ok(lines) => tracing::debug!(%run, lines, "engine output drained"),
                Err(e) => tracing::warn!(%run, error = %e, "engine output could not be logged"),
            }

            let failure = match status {
                Ok(s) if s.success() => None,
                Ok(s) => Some(s.to_string()),
                Err(e) => Some(format!("waiting for engine: {e}")),
            };
            if let Some(reason) = &failure {
                tracing::debug!(%run, %reason, "engine failed");
                if let Err(e) = tokio::fs::write(&marker_path, reason).await {
                    tracing::error!(%run, path = %marker_path.display(), error = %e, "cannot write failure marker");
                }
            }

            active
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&run);
            // The caller may have stopped waiting; the artifacts are on disk either way.
            let _ = done_tx.send(failure);
        });

        Ok((RunHandle { id: run, done }, log_err))
    }

    /// Current status of `run`.
    ///
    /// A run is `Running` while a process with its id exists. After that the
    /// failure marker decides. Ids with neither a marker nor a log were never
    /// runs in this directory and report `NotFound`.
    #[must_use]
    pub fn status(&self, run: RunId) -> RunStatus {
        let supervised = self
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&run);
        if supervised || process_exists(run) {
            return RunStatus::Running;
        }
        match std::fs::read_to_string(self.log_dir.join(run.failure_marker_name())) {
            Ok(reason) => return RunStatus::Failed(reason),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return RunStatus::Failed(format!("failure marker unreadable: {e}")),
        }
        if self.log_dir.join(run.log_file_name()).exists() {
            RunStatus::Succeeded
        } else {
            RunStatus::NotFound
        }
    }

    /// Read `state_file` from the working directory. Missing is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is unreadable or malformed.
    pub fn state(&self, state_file: &str) -> Result<Option<StateDocument>> {
        Ok(load_state(&self.dir.join(state_file))?)
    }

    /// Open the combined output log of `run`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError::UnknownRun`] if no log exists for `run`.
    pub fn output(&self, run: RunId) -> Result<std::fs::File> {
        let path = self.log_dir.join(run.log_file_name());
        match std::fs::File::open(&path) {
            Ok(f) => Ok(f),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ExecutorError::UnknownRun { run }.into())
            }
            Err(e) => Err(e).with_context(|| format!("opening {}", path.display())),
        }
    }

    /// Write a gzip-compressed tar of the working directory, without `logs/`.
    ///
    /// # Errors
    ///
    /// Returns an error on any I/O failure. Symlinks leaving the working
    /// directory are skipped, not failures.
    pub fn archive<W: Write>(&self, writer: W, include_top_level: bool) -> Result<()> {
        archive::write_tar_gz(&self.dir, writer, include_top_level, &[LOG_DIR])
    }

    /// Remove the working directory. Failures are logged and otherwise ignored.
    pub fn cleanup(&self) {
        if let Err(e) = std::fs::remove_dir_all(&self.dir) {
            tracing::warn!(dir = %self.dir.display(), error = %e, "cleanup failed");
        }
    }
}

impl EngineRunner for Executor {
    fn working_dir(&self) -> &Path {
        &self.dir
    }

    async fn run_to_completion(&self, args: &[String]) -> Result<RunId> {
        let (handle, log_err) = self.start(args).await?;
        let run = handle.id;
        // Wait even without a log: the engine owns the directory until it exits.
        match self.run_timeout {
            Some(timeout) => handle.wait_timeout(timeout).await?,
            None => handle.wait().await?,
        }
        match log_err {
            Some(err) => Err(err.into()),
            None => Ok(run),
        }
    }
}

/// Copy both streams line by line into `log`, in arrival order.
///
/// Both pipes are read to EOF whatever happens to the log: closing them early
/// would kill the engine with `SIGPIPE`. A log write failure only stops logging.
async fn drain_output<O, E>(
    stdout: Option<O>,
    stderr: Option<E>,
    mut log: Option<tokio::fs::File>,
) -> std::io::Result<u64>
where
    O: AsyncRead + Unpin,
    E: AsyncRead + Unpin,
{
    let mut out = stdout.map(|s| BufReader::new(s).split(b'\n'));
    let mut err = stderr.map(|s| BufReader::new(s).split(b'\n'));
    let mut lines = 0;

    while out.is_some() || err.is_some() {
        let (segment, from_stdout) = tokio::select! {
            seg = next_segment(&mut out), if out.is_some() => (seg?, true),
            seg = next_segment(&mut err), if err.is_some() => (seg?, false),
        };
        match segment {
            Some(mut line) => {
                lines += 1;
                if let Some(file) = log.as_mut() {
                    line.push(b'\n');
                    if let Err(e) = file.write_all(&line).await {
                        tracing::warn!(error = %e, "run log write failed, discarding further output");
                        log = None;
                    }
                }
            }
            None if from_stdout => out = None,
            None => err = None,
        }
    }

    if let Some(file) = log.as_mut() {
        if let Err(e) = file.flush().await {
            tracing::warn!(error = %e, "run log flush failed");
        }
    }
    Ok(lines)
}

async fn next_segment<R: AsyncRead + Unpin>(
    reader: &mut Option<tokio::io::Split<BufReader<R>>>,
) -> std::io::Result<Option<Vec<u8>>> {
    match reader {
        Some(r) => r.next_segment().await,
        None => Ok(None),
    }
}

fn ambient_environment() -> Vec<(String, String)> {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}

/// Whether any process with the run's id exists on this host.
#[cfg(target_os = "linux")]
fn process_exists(run: RunId) -> bool {
    run.0 != 0 && Path::new("/proc").join(run.0.to_string()).exists()
}

#[cfg(all(unix, not(target_os = "linux")))]
fn process_exists(run: RunId) -> bool {
    run.0 != 0
        && std::process::Command::new("kill")
            .args(["-0", &run.0.to_string()])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|s| s.success())
}

#[cfg(not(unix))]
fn process_exists(_run: RunId) -> bool {
    false
}
