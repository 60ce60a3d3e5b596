//! CLI tests for the `fetch-lfs` binary.
//!
//! Spawns the binary in a temporary project and stands in for `git lfs` with
//! `sh -c` scripts configured through `build-tools.toml`. The appended LFS
//! subcommand (`version` / `pull`) arrives as `$1`.
#![cfg(unix)]

use std::process::{Command, Output};

use build_tools::exit_codes;
use build_tools::test_support::TestProject;

fn fetch_lfs(project: &TestProject) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fetch-lfs"))
        .current_dir(project.path())
        .env_remove("RUST_LOG")
        .output()
        .expect("run fetch-lfs")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn no_repository_skips_and_exits_zero() {
    let project = TestProject::new().expect("project");

    let output = fetch_lfs(&project);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let text = stdout(&output);
    assert!(text.contains("📥 Checking for LFS files..."));
    assert!(text.contains("Not a git repository, skipping LFS download"));
}

#[test]
fn missing_tool_skips_pull_and_exits_zero() {
    let project = TestProject::with_git_marker().expect("project");
    project
        .write_config(
            r#"
[lfs]
command = ["sh", "-c", '[ "$1" = pull ] && touch pulled; exit 127', "fake-lfs"]
"#,
        )
        .expect("config");

    let output = fetch_lfs(&project);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(stdout(&output).contains("Git LFS not installed, skipping LFS download"));
    assert!(!project.path().join("pulled").exists());
}

#[test]
fn unspawnable_tool_skips_and_exits_zero() {
    let project = TestProject::with_git_marker().expect("project");
    project
        .write_config("[lfs]\ncommand = [\"build-tools-no-such-lfs\"]\n")
        .expect("config");

    let output = fetch_lfs(&project);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(stdout(&output).contains("Git LFS not installed"));
}

#[test]
fn successful_pull_materializes_files() {
    let project = TestProject::with_git_marker().expect("project");
    project
        .write_config(
            r#"
[lfs]
command = ["sh", "-c", '[ "$1" = pull ] && touch pulled; exit 0', "fake-lfs"]
"#,
        )
        .expect("config");

    let output = fetch_lfs(&project);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(stdout(&output).contains("✓ LFS files downloaded successfully"));
    assert!(project.path().join("pulled").exists());
}

#[test]
fn failed_pull_warns_with_stderr_and_exits_zero() {
    let project = TestProject::with_git_marker().expect("project");
    project
        .write_config(
            r#"
[lfs]
command = [
    "sh",
    "-c",
    'if [ "$1" = version ]; then exit 0; fi; echo "smudge error: object missing" >&2; exit 2',
    "fake-lfs",
]
"#,
        )
        .expect("config");

    let output = fetch_lfs(&project);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(stdout(&output).contains("⚠️  LFS download warning: smudge error: object missing"));
}

#[test]
fn invalid_config_falls_back_to_defaults() {
    let project = TestProject::new().expect("project");
    project
        .write_config("[lfs]\ncommand = []\n")
        .expect("config");

    let output = fetch_lfs(&project);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let text = stdout(&output);
    assert!(text.contains("LFS config error"));
    assert!(text.contains("Not a git repository"));
}
