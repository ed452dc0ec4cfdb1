//! Integration tests for the git worktree workspace manager.
//!
//! Each test initializes a throwaway repository with a `main` branch and
//! drives real `git` commands against it.

use camino::Utf8PathBuf;
use multiagent::task::domain::TaskId;
use multiagent::workspace::{
    adapters::git::GitWorkspaceManager,
    domain::{ArtifactPath, BranchName},
    ports::{WorkspaceError, WorkspaceManager},
};
use rstest::{fixture, rstest};
use std::process::Command;
use std::time::Duration;
use tempfile::TempDir;

struct Repo {
    _dir: TempDir,
    root: Utf8PathBuf,
    manager: GitWorkspaceManager,
}

fn git(root: &Utf8PathBuf, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(root)
        .status()
        .expect("git should be installed");
    assert!(status.success(), "git {args:?} failed");
}

#[fixture]
fn repo() -> Repo {
    let dir = TempDir::new().expect("temporary directory");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp path");
    git(&root, &["init", "--quiet", "--initial-branch=main"]);
    git(&root, &["config", "user.name", "Pipeline Test"]);
    git(&root, &["config", "user.email", "pipeline@example.com"]);
    git(&root, &["config", "commit.gpgsign", "false"]);
    git(&root, &["commit", "--quiet", "--allow-empty", "-m", "initial"]);
    let manager =
        GitWorkspaceManager::new(root.clone(), ".multiagent/worktrees").with_timeout(Duration::from_secs(30));
    Repo {
        _dir: dir,
        root,
        manager,
    }
}

fn task(id: &str) -> TaskId {
    TaskId::new(id).expect("valid task id")
}

fn plan_path() -> ArtifactPath {
    ArtifactPath::phase_output("plan").expect("valid artifact path")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_checks_out_a_task_branch(repo: Repo) {
    let workspace = repo
        .manager
        .create(&task("t-1"), &BranchName::main())
        .await
        .expect("workspace should be created");

    assert_eq!(workspace.branch().as_str(), "task/t-1");
    assert_eq!(
        workspace.path(),
        repo.root.join(".multiagent/worktrees/t-1").as_path()
    );
    assert!(workspace.path().is_dir());

    let entries = repo.manager.list().await.expect("worktrees listed");
    assert!(entries.iter().any(|entry| entry.task_id() == Some(task("t-1"))));
    let found = repo.manager.find(&task("t-1")).await.expect("lookup succeeds");
    assert_eq!(found.map(|ws| ws.task_id().clone()), Some(task("t-1")));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_refuses_existing_branch_and_missing_base(repo: Repo) {
    repo.manager
        .create(&task("t-1"), &BranchName::main())
        .await
        .expect("first creation succeeds");

    let duplicate = repo.manager.create(&task("t-1"), &BranchName::main()).await;
    assert!(matches!(duplicate, Err(WorkspaceError::BranchExists(_))));

    let develop = BranchName::new("develop").expect("valid branch");
    let missing = repo.manager.create(&task("t-2"), &develop).await;
    assert!(matches!(missing, Err(WorkspaceError::BaseBranchMissing(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn checkpoint_commits_only_pending_changes(repo: Repo) {
    let workspace = repo
        .manager
        .create(&task("t-1"), &BranchName::main())
        .await
        .expect("workspace should be created");

    repo.manager
        .write_artifact(&workspace, &plan_path(), "the plan")
        .await
        .expect("artifact written");
    let first = repo
        .manager
        .checkpoint(&workspace, "checkpoint: t-1 plan")
        .await
        .expect("checkpoint succeeds");
    let second = repo
        .manager
        .checkpoint(&workspace, "checkpoint: t-1 plan")
        .await
        .expect("clean checkpoint succeeds");

    assert!(first);
    assert!(!second);
    let read = repo
        .manager
        .read_artifact(&workspace, &plan_path())
        .await
        .expect("artifact readable");
    assert_eq!(read.as_deref(), Some("the plan"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn merge_back_stages_task_changes_on_the_base(repo: Repo) {
    let workspace = repo
        .manager
        .create(&task("t-1"), &BranchName::main())
        .await
        .expect("workspace should be created");
    repo.manager
        .write_artifact(&workspace, &plan_path(), "the plan")
        .await
        .expect("artifact written");
    repo.manager
        .checkpoint(&workspace, "checkpoint: t-1 plan")
        .await
        .expect("checkpoint succeeds");

    repo.manager
        .merge_back(&task("t-1"), &BranchName::main(), true)
        .await
        .expect("merge succeeds");

    let merged = std::fs::read_to_string(repo.root.join(".task/plan.md")).expect("merged file");
    assert_eq!(merged, "the plan");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cleanup_removes_worktree_and_branch(repo: Repo) {
    let workspace = repo
        .manager
        .create(&task("t-1"), &BranchName::main())
        .await
        .expect("workspace should be created");

    repo.manager
        .cleanup(&task("t-1"), true)
        .await
        .expect("cleanup succeeds");

    assert!(!workspace.path().exists());
    assert_eq!(repo.manager.find(&task("t-1")).await.expect("lookup succeeds"), None);
    let again = repo.manager.cleanup(&task("t-1"), true).await;
    assert!(matches!(again, Err(WorkspaceError::NotFound(_))));
}
