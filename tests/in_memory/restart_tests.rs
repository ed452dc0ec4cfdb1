//! Blocked tasks resumed by a fresh orchestrator over the same state.

use super::helpers::{
    ARCHITECT_MODEL, CODER_MODEL, Project, TESTER_MODEL, approve, project, reject, task_id, text,
};
use multiagent::orchestration::services::RunTaskRequest;
use multiagent::routing::adapters::memory::ScriptedCompletionProvider;
use multiagent::specification::domain::SpecName;
use multiagent::task::domain::{Phase, TaskStatus};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn blocked_task_resumes_after_restart(project: Project) {
    let first = ScriptedCompletionProvider::new()
        .with_replies(ARCHITECT_MODEL, [text("1. Build the form"), reject("no tests")])
        .with_replies(CODER_MODEL, [text("fn login() {}"), text("fn login() {} // v2")]);
    let request = RunTaskRequest::new(SpecName::new("login").expect("valid spec name"))
        .with_task_id(task_id("login-1"))
        .with_max_iterations(1);

    let blocked = project
        .pipeline(&first)
        .run(request)
        .await
        .expect("task should run");

    assert_eq!(blocked.status, TaskStatus::Blocked);
    assert_eq!(blocked.phase, Phase::Implementation);
    assert_eq!(blocked.last_issues, ["no tests"]);
    assert!(project.workspaces.merges().is_empty());

    let second = ScriptedCompletionProvider::new()
        .with_replies(TESTER_MODEL, [text("#[test] fn logs_in() {}")])
        .with_default(approve());
    let resumed = project
        .pipeline(&second)
        .resume(&task_id("login-1"))
        .await
        .expect("task should resume");

    assert!(resumed.is_done());
    assert_eq!(
        second.called_models(),
        [ARCHITECT_MODEL, TESTER_MODEL, ARCHITECT_MODEL, ARCHITECT_MODEL]
    );
    assert_eq!(project.workspaces.merges().len(), 1);
}
