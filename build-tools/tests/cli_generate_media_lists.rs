//! CLI tests for the `generate-media-lists` binary.
//!
//! The generator is replaced by `sh -c` scripts configured through
//! `build-tools.toml`; the binary must mirror their output and exit code.
#![cfg(unix)]

use std::process::{Command, Output};

use build_tools::exit_codes;
use build_tools::test_support::TestProject;

fn generate(project: &TestProject) -> Output {
    Command::new(env!("CARGO_BIN_EXE_generate-media-lists"))
        .current_dir(project.path())
        .env_remove("RUST_LOG")
        .output()
        .expect("run generate-media-lists")
}

fn with_generator(script: &str) -> TestProject {
    let project = TestProject::new().expect("project");
    project
        .write_config(&format!(
            "[generator]\ncommand = [\"sh\", \"-c\", '{script}']\n"
        ))
        .expect("config");
    project
}

#[test]
fn child_failure_is_mirrored() {
    let project = with_generator("echo \"missing config\" >&2; exit 2");

    let output = generate(&project);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing config"));
}

#[test]
fn child_stdout_is_relayed() {
    let project =
        with_generator("printf \"media-list.json: 12 items\\naudio-list.json: 3 items\\n\"");

    let output = generate(&project);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.starts_with("📋 Generating media lists...\n"));
    assert!(text.contains("media-list.json: 12 items\naudio-list.json: 3 items\n"));
    assert!(output.stderr.is_empty());
}

#[test]
fn arbitrary_exit_code_is_mirrored() {
    let project = with_generator("exit 7");

    let output = generate(&project);

    assert_eq!(output.status.code(), Some(7));
}

#[test]
fn generator_runs_in_project_root() {
    let project = with_generator("touch generated");

    let output = generate(&project);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(project.path().join("generated").exists());
}

#[test]
fn missing_runtime_exits_with_failure() {
    let project = TestProject::new().expect("project");
    project
        .write_config("[generator]\ncommand = [\"build-tools-no-such-runtime\", \"gen.js\"]\n")
        .expect("config");

    let output = generate(&project);

    assert_eq!(output.status.code(), Some(exit_codes::FAILURE));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("❌ Error: spawn build-tools-no-such-runtime gen.js"));
}

#[test]
fn invalid_config_exits_with_failure() {
    let project = TestProject::new().expect("project");
    project
        .write_config("[generator]\ntimeout_secs = 0\n")
        .expect("config");

    let output = generate(&project);

    assert_eq!(output.status.code(), Some(exit_codes::FAILURE));
    assert!(String::from_utf8_lossy(&output.stderr).contains("generator.timeout_secs must be > 0"));
}
