//! A task driven from planning to merge through the model router.

use super::helpers::{
    ARCHITECT_MODEL, CODER_MODEL, Project, TESTER_MODEL, approve, project, reject, task_id, text,
};
use multiagent::orchestration::services::{OrchestrationError, RunTaskRequest};
use multiagent::routing::adapters::memory::ScriptedCompletionProvider;
use multiagent::specification::{domain::SpecName, ports::SpecificationError};
use multiagent::task::{
    domain::{Phase, TaskStatus},
    ports::TaskStateStore,
};
use rstest::rstest;

fn login() -> SpecName {
    SpecName::new("login").expect("valid spec name")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_implementation_is_fixed_and_merged(project: Project) {
    let provider = ScriptedCompletionProvider::new()
        .with_replies(
            ARCHITECT_MODEL,
            [
                text("1. Build the form"),
                reject("missing validation"),
                approve(),
                approve(),
                approve(),
            ],
        )
        .with_replies(
            CODER_MODEL,
            [text("fn login() {}"), text("fn login() -> bool { true }")],
        )
        .with_replies(TESTER_MODEL, [text("#[test] fn logs_in() {}")]);
    let pipeline = project.pipeline(&provider);

    let report = pipeline
        .run(RunTaskRequest::new(login()).with_task_id(task_id("login-1")))
        .await
        .expect("task should run");

    assert!(report.is_done());
    assert_eq!(
        provider.called_models(),
        [
            ARCHITECT_MODEL,
            CODER_MODEL,
            ARCHITECT_MODEL,
            CODER_MODEL,
            ARCHITECT_MODEL,
            TESTER_MODEL,
            ARCHITECT_MODEL,
            ARCHITECT_MODEL,
        ]
    );
    let prompts = provider.prompts();
    let fix_prompt = prompts.get(3).expect("fix prompt sent");
    assert!(fix_prompt.contains("missing validation"));

    let id = task_id("login-1");
    assert_eq!(
        project.artifact(&id, "implementation").await.as_deref(),
        Some("fn login() -> bool { true }")
    );
    let review = project.artifact(&id, "review").await.expect("review artifact");
    assert!(review.contains("## Tests\n\n#[test] fn logs_in() {}"));

    let merges = project.workspaces.merges();
    assert_eq!(merges.len(), 1);

    let record = project
        .store()
        .load(&id)
        .await
        .expect("state readable")
        .expect("record persisted");
    assert_eq!(record.status(), TaskStatus::Done);
    assert_eq!(record.phase(), Phase::Done);
    let implementation_rounds = record
        .history()
        .iter()
        .filter(|entry| entry.phase == Phase::Implementation)
        .count();
    assert_eq!(implementation_rounds, 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_specification_is_reported(project: Project) {
    let pipeline = project.pipeline(&ScriptedCompletionProvider::new());
    let missing = SpecName::new("signup").expect("valid spec name");

    let result = pipeline.run(RunTaskRequest::new(missing)).await;

    assert!(matches!(
        result,
        Err(OrchestrationError::Specification(SpecificationError::NotFound(_)))
    ));
    let listed = project.store().list_tasks().await.expect("state readable");
    assert!(listed.is_empty());
}
