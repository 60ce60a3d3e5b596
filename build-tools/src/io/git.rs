//! Git LFS adapter for the fetch step.
//!
//! Only two LFS subcommands are used (`version` and `pull`), and their output
//! is never parsed, so the wrapper stays a thin layer over [`ProcessRunner`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, instrument};

use super::config::LfsConfig;
use super::process::{CommandOutput, CommandSpec, ProcessRunner};

/// True if `root` carries git metadata.
///
/// `.git` may be a directory or, for worktrees and submodules, a file.
pub fn has_repository_marker(root: &Path) -> bool {
    root.join(".git").exists()
}

/// Wrapper for executing the LFS tool in a working directory.
#[derive(Debug, Clone)]
pub struct GitLfs {
    command: Vec<String>,
    workdir: PathBuf,
    timeout: Option<Duration>,
}

impl GitLfs {
    pub fn new(config: &LfsConfig, workdir: impl Into<PathBuf>) -> Self {
        Self {
            command: config.command.clone(),
            workdir: workdir.into(),
            timeout: config.timeout(),
        }
    }

    /// Check whether the LFS tool answers `version`.
    ///
    /// Spawn failures, non-zero exits and timeouts all count as "not installed".
    #[instrument(skip_all)]
    pub fn probe<R: ProcessRunner>(&self, runner: &R) -> bool {
        let output = self.spec("version").and_then(|spec| runner.run(&spec));
        match output {
            Ok(out) if out.success() => {
                debug!(version = %out.stdout_text().trim(), "lfs tool available");
                true
            }
            Ok(out) => {
                debug!(
                    exit_code = ?out.code,
                    timed_out = out.timed_out.is_some(),
                    "lfs probe failed"
                );
                false
            }
            Err(err) => {
                debug!(err = %format!("{err:#}"), "lfs probe could not run");
                false
            }
        }
    }

    /// Run `pull`, materializing files referenced by pointer files.
    ///
    /// A non-zero exit is returned as output, not as an error.
    #[instrument(skip_all)]
    pub fn pull<R: ProcessRunner>(&self, runner: &R) -> Result<CommandOutput> {
        let spec = self.spec("pull")?;
        runner.run(&spec)
    }

    fn spec(&self, subcommand: &str) -> Result<CommandSpec> {
        Ok(CommandSpec::from_argv(&self.command, &self.workdir)?
            .arg(subcommand)
            .with_timeout(self.timeout))
    }
}
