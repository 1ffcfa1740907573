//! Stage apply/destroy orchestration against a recording engine.

#![allow(clippy::unwrap_used)]

use stagehand_cli::application::services::stage_run::{
    apply_all, apply_stage, destroy_bootstrap, destroy_stage,
};
use stagehand_cli::domain::stage::BOOTSTRAP_MODULE;
use stagehand_cli::domain::{DestroyPolicy, Platform, Stage, stages_for_platform};

use crate::mocks::{RecordingReporter, RecordingRunner};

const TARGET: &str = "-target=module.bootstrap";

fn extra() -> Vec<String> {
    vec!["-parallelism=4".to_string()]
}

#[tokio::test]
async fn test_apply_stage_runs_init_then_apply() {
    let runner = RecordingRunner::new();
    let stage = Stage::new(Platform::Aws, "cluster", DestroyPolicy::Retained);

    apply_stage(&runner, &stage, &extra()).await.unwrap();

    let calls = runner.calls.borrow();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], ["init", "-input=false", "-no-color"]);
    assert_eq!(calls[1][0], "apply");
    assert!(calls[1].contains(&"-auto-approve".to_string()));
    assert!(calls[1].contains(&"-state=cluster.tfstate".to_string()));
    assert!(calls[1].contains(&"-var-file=terraform.tfvars.json".to_string()));
    assert_eq!(calls[1].last().unwrap(), "-parallelism=4");
}

#[tokio::test]
async fn test_apply_stage_failure_names_stage_and_dir() {
    let runner = RecordingRunner::failing_on("apply");
    let stage = Stage::new(Platform::Gcp, "bootstrap", DestroyPolicy::WithBootstrap);

    let err = apply_stage(&runner, &stage, &[]).await.unwrap_err();

    let msg = format!("{err:#}");
    assert!(msg.contains("applying stage bootstrap in /work/cluster"), "{msg}");
    assert!(msg.contains("exit status: 1"), "{msg}");
}

#[tokio::test]
async fn test_destroy_scoped_only_for_bootstrap_stages() {
    for platform in Platform::ALL.iter().copied() {
        for stage in stages_for_platform(platform) {
            let runner = RecordingRunner::new();
            destroy_stage(&runner, &stage, &[]).await.unwrap();

            let calls = runner.calls.borrow();
            assert_eq!(calls.len(), 1);
            let args = &calls[0];
            assert_eq!(args[0], "destroy");
            let scoped = args.iter().any(|a| a == TARGET);
            assert_eq!(
                scoped,
                stage.destroy_policy == DestroyPolicy::WithBootstrap,
                "{platform}/{}: {args:?}",
                stage.name
            );
        }
    }
    assert_eq!(TARGET, format!("-target={BOOTSTRAP_MODULE}"));
}

#[tokio::test]
async fn test_apply_all_stops_at_first_failure() {
    let runner = RecordingRunner::failing_on("apply");
    let reporter = RecordingReporter::default();
    let stages = stages_for_platform(Platform::Aws);

    let result = apply_all(&runner, &stages, &[], &reporter).await;

    assert!(result.is_err());
    // init + failing apply of the first stage; the second stage never starts
    assert_eq!(runner.commands(), ["init", "apply"]);
    assert!(
        !reporter
            .messages
            .borrow()
            .iter()
            .any(|m| m.starts_with("success:"))
    );
}

#[tokio::test]
async fn test_apply_all_returns_one_run_per_stage() {
    let runner = RecordingRunner::new();
    let reporter = RecordingReporter::default();
    let stages = stages_for_platform(Platform::Libvirt);

    let runs = apply_all(&runner, &stages, &[], &reporter).await.unwrap();

    assert_eq!(runs.len(), 2);
    assert_eq!(runner.commands(), ["init", "apply", "init", "apply"]);
    let messages = reporter.messages.borrow();
    assert_eq!(messages.last().unwrap(), "success: stage bootstrap applied");
}

#[tokio::test]
async fn test_destroy_bootstrap_skips_retained_stages() {
    let runner = RecordingRunner::new();
    let reporter = RecordingReporter::default();
    let stages = stages_for_platform(Platform::Azure);

    let runs = destroy_bootstrap(&runner, &stages, &extra(), &reporter)
        .await
        .unwrap();

    assert_eq!(runs.len(), 1);
    let calls = runner.calls.borrow();
    assert!(calls[0].contains(&"-state=bootstrap.tfstate".to_string()));
    assert!(calls[0].contains(&TARGET.to_string()));
}

#[tokio::test]
async fn test_destroy_bootstrap_warns_when_nothing_to_destroy() {
    let runner = RecordingRunner::new();
    let reporter = RecordingReporter::default();
    let stages = stages_for_platform(Platform::PowerVs);

    let runs = destroy_bootstrap(&runner, &stages, &[], &reporter)
        .await
        .unwrap();

    assert!(runs.is_empty());
    assert!(runner.calls.borrow().is_empty());
    assert!(reporter.messages.borrow()[0].starts_with("warn:"));
}
