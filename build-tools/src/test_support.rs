//! Test-only helpers: a scripted process runner and throwaway project roots.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tempfile::TempDir;

use crate::io::config::CONFIG_FILE_NAME;
use crate::io::process::{CommandOutput, CommandSpec, ProcessRunner};

/// Output of a child that exited normally with `code`.
pub fn exited(code: i32, stdout: &str, stderr: &str) -> CommandOutput {
    CommandOutput {
        code: Some(code),
        stdout: stdout.as_bytes().to_vec(),
        stderr: stderr.as_bytes().to_vec(),
        timed_out: None,
    }
}

/// Output of a child killed once `limit` elapsed.
pub fn timed_out(limit: Duration) -> CommandOutput {
    CommandOutput {
        code: None,
        timed_out: Some(limit),
        ..CommandOutput::default()
    }
}

/// Process runner that replays queued results and records every invocation.
///
/// Running more commands than were queued yields an error, so tests also catch
/// unexpected invocations.
pub struct ScriptedRunner {
    responses: RefCell<VecDeque<Result<CommandOutput>>>,
    calls: RefCell<Vec<CommandSpec>>,
}

impl ScriptedRunner {
    pub fn new(responses: Vec<Result<CommandOutput>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Runner that must never be asked to run anything.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        self.calls.borrow_mut().push(spec.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("unexpected command: {}", spec.display())))
    }
}

/// Temporary project root, optionally marked as a git checkout.
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp project")?;
        Ok(Self { dir })
    }

    /// Project with an (empty) `.git` directory.
    pub fn with_git_marker() -> Result<Self> {
        let project = Self::new()?;
        fs::create_dir(project.path().join(".git")).context("create .git")?;
        Ok(project)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_config(&self, toml: &str) -> Result<()> {
        let path = self.path().join(CONFIG_FILE_NAME);
        fs::write(&path, toml).with_context(|| format!("write {}", path.display()))
    }
}
