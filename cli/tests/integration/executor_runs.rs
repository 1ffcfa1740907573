//! Engine runs against a real shell: logs, failure markers, environment.

#![cfg(unix)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use stagehand_cli::domain::error::ExecutorError;
use stagehand_cli::domain::{RunId, RunStatus};
use stagehand_cli::infra::executor::Executor;

fn shell(dir: &Path) -> Executor {
    Executor::with_binary(dir, PathBuf::from("/bin/sh"))
        .unwrap()
        .with_ambient_env([("PATH", "/usr/bin:/bin")])
}

fn script(body: &str) -> Vec<String> {
    vec!["-c".to_string(), body.to_string()]
}

fn log_of(exec: &Executor, run: RunId) -> String {
    let mut out = String::new();
    exec.output(run).unwrap().read_to_string(&mut out).unwrap();
    out
}

async fn settle(exec: &Executor, run: RunId) -> RunStatus {
    for _ in 0..200 {
        let status = exec.status(run);
        if status.is_terminal() {
            return status;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    exec.status(run)
}

#[tokio::test]
async fn test_successful_run_has_log_and_no_marker() {
    let dir = tempfile::TempDir::new().unwrap();
    let exec = shell(dir.path());

    let handle = exec.execute(&script("echo applied")).await.unwrap();
    let run = handle.id;
    handle.wait().await.unwrap();

    assert_eq!(exec.status(run), RunStatus::Succeeded);
    assert!(dir.path().join("logs").join(format!("{run}.log")).exists());
    assert!(!dir.path().join("logs").join(format!("{run}.fail")).exists());
    assert_eq!(log_of(&exec, run), "applied\n");
}

#[tokio::test]
async fn test_failed_run_writes_marker_before_completion() {
    let dir = tempfile::TempDir::new().unwrap();
    let exec = shell(dir.path());

    let handle = exec
        .execute(&script("echo out; echo err >&2; exit 3"))
        .await
        .unwrap();
    let run = handle.id;
    let err = handle.wait().await.unwrap_err();

    assert!(matches!(err, ExecutorError::RunFailed { .. }), "{err}");
    let marker = dir.path().join("logs").join(format!("{run}.fail"));
    let reason = std::fs::read_to_string(marker).unwrap();
    assert!(reason.contains('3'), "{reason}");
    assert_eq!(exec.status(run), RunStatus::Failed(reason));

    let log = log_of(&exec, run);
    assert!(log.contains("out\n"), "{log}");
    assert!(log.contains("err\n"), "{log}");
}

#[tokio::test]
async fn test_status_is_running_until_exit() {
    let dir = tempfile::TempDir::new().unwrap();
    let exec = shell(dir.path());

    let handle = exec.execute(&script("sleep 0.5")).await.unwrap();
    let run = handle.id;
    assert_eq!(exec.status(run), RunStatus::Running);

    handle.wait().await.unwrap();
    assert_eq!(exec.status(run), RunStatus::Succeeded);
}

#[tokio::test]
async fn test_wait_timeout_leaves_run_going() {
    let dir = tempfile::TempDir::new().unwrap();
    let exec = shell(dir.path());

    let handle = exec
        .execute(&script("sleep 0.5; echo finished"))
        .await
        .unwrap();
    let run = handle.id;
    let err = handle
        .wait_timeout(Duration::from_millis(50))
        .await
        .unwrap_err();
    assert!(matches!(err, ExecutorError::WaitTimedOut { .. }), "{err}");
    assert!(err.to_string().contains("within 50ms"), "{err}");
    assert_eq!(exec.status(run), RunStatus::Running);

    assert_eq!(settle(&exec, run).await, RunStatus::Succeeded);
    assert_eq!(log_of(&exec, run), "finished\n");
}

#[tokio::test]
async fn test_dropped_handle_does_not_kill_run() {
    let dir = tempfile::TempDir::new().unwrap();
    let exec = shell(dir.path());

    let run = {
        let handle = exec
            .execute(&script("sleep 0.3; echo survived; exit 4"))
            .await
            .unwrap();
        handle.id
    };

    let status = settle(&exec, run).await;
    assert!(matches!(status, RunStatus::Failed(_)), "{status}");
    assert_eq!(log_of(&exec, run), "survived\n");
}

#[tokio::test]
async fn test_engine_sees_only_allowed_ambient_variables() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut exec = Executor::with_binary(dir.path(), PathBuf::from("/bin/sh"))
        .unwrap()
        .with_ambient_env([
            ("PATH", "/usr/bin:/bin"),
            ("HOME", "/home/installer"),
            ("DISPLAY", ":1"),
            ("SSH_AUTH_SOCK", "/tmp/agent.sock"),
            ("AWS_SECRET_ACCESS_KEY", "ambient-secret"),
            ("TF_LOG", "TRACE"),
        ]);
    exec.add_environment_variables([("TF_VAR_region", "eu-west-1"), ("DISPLAY", ":9")]);
    exec.add_environment_variables([("TF_VAR_region", "us-east-2")]);

    let handle = exec.execute(&script("env")).await.unwrap();
    let run = handle.id;
    handle.wait().await.unwrap();
    let env = log_of(&exec, run);
    let lines: Vec<&str> = env.lines().collect();

    assert!(lines.contains(&"PATH=/usr/bin:/bin"), "{env}");
    assert!(lines.contains(&"HOME=/home/installer"), "{env}");
    assert!(lines.contains(&"SSH_AUTH_SOCK=/tmp/agent.sock"), "{env}");
    assert!(lines.contains(&"DISPLAY=:9"), "{env}");
    assert!(lines.contains(&"TF_VAR_region=us-east-2"), "{env}");
    assert!(!env.contains("AWS_SECRET_ACCESS_KEY"), "{env}");
    assert!(!env.contains("TF_LOG"), "{env}");
}

#[tokio::test]
async fn test_engine_runs_in_working_directory() {
    let dir = tempfile::TempDir::new().unwrap();
    let exec = shell(dir.path());

    let handle = exec.execute(&script("touch created-here")).await.unwrap();
    handle.wait().await.unwrap();

    assert!(dir.path().join("created-here").exists());
}

#[tokio::test]
async fn test_unknown_run_has_no_output() {
    let dir = tempfile::TempDir::new().unwrap();
    let exec = shell(dir.path());

    assert_eq!(exec.status(RunId(u32::MAX - 1)), RunStatus::NotFound);
    let err = exec.output(RunId(u32::MAX - 1)).unwrap_err();
    assert!(err.to_string().contains("no log found"), "{err:#}");
}

#[tokio::test]
async fn test_missing_binary_spawns_nothing() {
    let dir = tempfile::TempDir::new().unwrap();
    let exec = Executor::with_binary(dir.path(), dir.path().join("no-such-engine")).unwrap();

    let err = exec.execute(&script("true")).await.err().unwrap();
    assert!(matches!(err, ExecutorError::Spawn { .. }), "{err}");
    let logs: Vec<_> = std::fs::read_dir(dir.path().join("logs")).unwrap().collect();
    assert!(logs.is_empty());
}

#[test]
fn test_cleanup_removes_working_directory() {
    let dir = tempfile::TempDir::new().unwrap();
    let work = dir.path().join("stage");
    let exec = shell(&work);
    std::fs::write(work.join("main.tf"), "").unwrap();

    exec.cleanup();

    assert!(!work.exists());
}
