//! Tests for branch names, artifact paths and the worktree listing parser.

use crate::task::domain::TaskId;
use crate::workspace::domain::{
    ArtifactPath, BranchName, WorkspaceDomainError, parse_worktree_porcelain,
};
use rstest::rstest;

const TWO_WORKTREES: &str = "worktree /repo\n\
HEAD 1111111111111111111111111111111111111111\n\
branch refs/heads/main\n\
\n\
worktree /repo/.multiagent/worktrees/login-1\n\
HEAD 2222222222222222222222222222222222222222\n\
branch refs/heads/task/login-1\n";

#[rstest]
#[case::with_trailing_blank(format!("{TWO_WORKTREES}\n"))]
#[case::without_trailing_blank(TWO_WORKTREES.to_owned())]
#[case::without_final_newline(TWO_WORKTREES.trim_end().to_owned())]
#[case::crlf_line_endings(TWO_WORKTREES.replace('\n', "\r\n"))]
fn porcelain_parser_returns_both_records(#[case] text: String) {
    let entries = parse_worktree_porcelain(&text);

    let [main, task] = entries.as_slice() else {
        panic!("expected two entries, got {entries:?}");
    };
    assert_eq!(main.path(), "/repo");
    assert_eq!(main.branch(), Some("refs/heads/main"));
    assert_eq!(main.branch_name(), Some("main"));
    assert_eq!(main.task_id(), None);
    assert_eq!(task.path(), "/repo/.multiagent/worktrees/login-1");
    assert_eq!(task.branch(), Some("refs/heads/task/login-1"));
    assert_eq!(
        task.head(),
        Some("2222222222222222222222222222222222222222")
    );
    assert_eq!(task.task_id(), TaskId::new("login-1").ok());
}

#[rstest]
fn porcelain_parser_handles_detached_and_bare_records() {
    let text = "worktree /bare\nbare\n\nworktree /detached\nHEAD abc\ndetached\n\n\n";

    let entries = parse_worktree_porcelain(text);

    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|entry| entry.branch().is_none()));
    assert!(entries.last().is_some_and(|entry| entry.is_detached()));
}

#[rstest]
fn porcelain_parser_ignores_empty_and_orphan_lines() {
    assert!(parse_worktree_porcelain("").is_empty());
    assert!(parse_worktree_porcelain("branch refs/heads/main\n\n").is_empty());
}

#[rstest]
#[case("main")]
#[case("release/v1.2")]
#[case("task/login-1")]
fn branch_names_accept_git_safe_values(#[case] value: &str) {
    assert_eq!(
        BranchName::new(value).map(String::from),
        Ok(value.to_owned())
    );
}

#[rstest]
#[case("")]
#[case("has space")]
#[case("double..dot")]
#[case("-leading-dash")]
#[case("trailing/")]
#[case("ends.lock")]
#[case("at@{brace")]
#[case("colon:name")]
fn branch_names_reject_unsafe_values(#[case] value: &str) {
    assert_eq!(
        BranchName::new(value),
        Err(WorkspaceDomainError::InvalidBranchName(value.to_owned()))
    );
}

#[rstest]
fn task_branch_uses_task_prefix() {
    let task_id = TaskId::new("login-1").expect("valid task id");
    let branch = BranchName::for_task(&task_id);

    assert_eq!(branch.as_str(), "task/login-1");
    assert_eq!(branch.to_ref(), "refs/heads/task/login-1");
}

#[rstest]
#[case::plain("notes.md", true)]
#[case::nested("src/lib.rs", true)]
#[case::current_dir("./src/lib.rs", true)]
#[case::parent("../escape.rs", false)]
#[case::nested_parent("src/../../escape.rs", false)]
#[case::absolute("/etc/passwd", false)]
#[case::empty("", false)]
#[case::only_current(".", false)]
fn artifact_paths_stay_inside_workspace(#[case] value: &str, #[case] accepted: bool) {
    assert_eq!(ArtifactPath::new(value).is_ok(), accepted);
}

#[rstest]
fn phase_outputs_live_in_artifact_directory() {
    let path = ArtifactPath::phase_output("plan").expect("valid stem");

    assert_eq!(path.as_path(), ".task/plan.md");
    assert!(ArtifactPath::phase_output("../plan").is_err());
}
