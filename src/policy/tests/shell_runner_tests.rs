//! Tests for policy-checked shell execution.

use std::time::Duration;

use crate::policy::{
    domain::{CommandPolicy, ViolationKind},
    services::{ShellError, ShellRunner},
};
use camino::{Utf8Path, Utf8PathBuf};
use rstest::{fixture, rstest};
use tempfile::TempDir;

struct Sandbox {
    _dir: TempDir,
    root: Utf8PathBuf,
}

#[fixture]
fn sandbox() -> Sandbox {
    let dir = TempDir::new().expect("create temp dir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp path");
    Sandbox { _dir: dir, root }
}

fn runner(sandbox: &Sandbox) -> ShellRunner {
    ShellRunner::new(
        CommandPolicy::standard()
            .expect("built-in patterns compile")
            .confined_to(&sandbox.root),
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn allowed_command_runs_and_captures_output(sandbox: Sandbox) {
    let output = runner(&sandbox)
        .run("echo hello", None)
        .await
        .expect("echo runs");

    assert!(output.success());
    assert_eq!(output.stdout.trim(), "hello");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn commands_run_inside_the_requested_directory(sandbox: Sandbox) {
    std::fs::create_dir(sandbox.root.join("sub")).expect("create subdirectory");

    runner(&sandbox)
        .run("echo written > marker.txt", Some(Utf8Path::new("sub")))
        .await
        .expect("echo runs");

    let marker = std::fs::read_to_string(sandbox.root.join("sub/marker.txt"))
        .expect("marker written in subdirectory");
    assert_eq!(marker.trim(), "written");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn refused_command_never_runs(sandbox: Sandbox) {
    let err = runner(&sandbox)
        .run("touch created.txt", None)
        .await
        .expect_err("touch is not allowed");

    assert!(matches!(
        err,
        ShellError::Policy(ref violation) if violation.kind == ViolationKind::NotAllowed("touch".to_owned())
    ));
    assert!(!sandbox.root.join("created.txt").exists());
    assert!(!err.is_recoverable());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn directory_outside_the_root_is_refused(sandbox: Sandbox) {
    let err = runner(&sandbox)
        .run("ls", Some(Utf8Path::new("/")))
        .await
        .expect_err("root directory escapes the sandbox");

    assert!(matches!(
        err,
        ShellError::Policy(ref violation) if matches!(violation.kind, ViolationKind::OutsideRoot { .. })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn non_zero_exit_is_reported_not_raised(sandbox: Sandbox) {
    let output = runner(&sandbox)
        .run("ls does-not-exist", None)
        .await
        .expect("ls runs");

    assert!(!output.success());
    assert!(!output.stderr.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn slow_command_times_out_recoverably(sandbox: Sandbox) {
    let slow = ShellRunner::new(
        CommandPolicy::standard()
            .expect("built-in patterns compile")
            .with_allowed_program("sleep"),
    )
    .with_timeout(Duration::from_millis(100));

    let err = slow
        .run("sleep 5", Some(sandbox.root.as_path()))
        .await
        .expect_err("sleep outlives the budget");

    assert!(matches!(err, ShellError::TimedOut { timeout_secs: 0, .. }));
    assert!(err.is_recoverable());
}
