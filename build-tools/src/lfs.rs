//! Best-effort Git LFS prefetch for `fetch-lfs`.
//!
//! Asset download is optional for the build, so every failure mode (no
//! repository, no LFS tool, failed pull, unexpected error) is reported on the
//! console and absorbed. Callers get `true` back in every case.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, instrument, warn};

use crate::io::config::LfsConfig;
use crate::io::git::{GitLfs, has_repository_marker};
use crate::io::process::ProcessRunner;

/// What a fetch attempt ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// No `.git` in the project root; nothing was run.
    NotARepository,
    /// The LFS `version` probe failed; `pull` was not run.
    ToolMissing,
    /// `pull` exited 0.
    Pulled,
    /// `pull` exited non-zero (or was killed by a signal).
    PullFailed { code: Option<i32>, stderr: String },
    /// `pull` was killed after the configured timeout.
    PullTimedOut { secs: u64 },
}

impl FetchOutcome {
    /// Whether the build step counts as successful. Always true: a missing or
    /// failed LFS download never fails the build.
    pub fn succeeded(&self) -> bool {
        true
    }
}

/// Fetch LFS assets into `root`, printing progress to `out`.
///
/// Returns `true` for every outcome, including unexpected errors, which are
/// printed as a warning.
pub fn fetch_lfs_assets<R: ProcessRunner, W: Write>(
    root: &Path,
    config: &LfsConfig,
    runner: &R,
    out: &mut W,
) -> bool {
    match fetch(root, config, runner, out) {
        Ok(outcome) => {
            debug!(?outcome, "lfs fetch finished");
            outcome.succeeded()
        }
        Err(err) => {
            warn!(err = %format!("{err:#}"), "lfs download error");
            // Nowhere left to report a console write failure.
            let _ = writeln!(out, "⚠️  LFS download error: {err:#}");
            true
        }
    }
}

/// Run the fetch sequence and report each step on `out`.
///
/// `Err` is reserved for unexpected failures: the pull could not be spawned or
/// the console could not be written.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn fetch<R: ProcessRunner, W: Write>(
    root: &Path,
    config: &LfsConfig,
    runner: &R,
    out: &mut W,
) -> Result<FetchOutcome> {
    writeln!(out, "📥 Checking for LFS files...")?;

    if !has_repository_marker(root) {
        warn!("not a git repository, skipping lfs download");
        writeln!(out, "⚠️  Not a git repository, skipping LFS download")?;
        return Ok(FetchOutcome::NotARepository);
    }

    let lfs = GitLfs::new(config, root);
    if !lfs.probe(runner) {
        warn!("lfs tool not available, skipping lfs download");
        writeln!(out, "⚠️  Git LFS not installed, skipping LFS download")?;
        writeln!(out, "   Install with: git lfs install")?;
        return Ok(FetchOutcome::ToolMissing);
    }

    writeln!(out, "   Downloading LFS files...")?;
    let output = lfs.pull(runner).context("run lfs pull")?;

    if let Some(limit) = output.timed_out {
        let secs = limit.as_secs();
        warn!(timeout_secs = secs, "lfs pull timed out");
        writeln!(out, "⚠️  LFS download warning: timed out after {secs}s")?;
        return Ok(FetchOutcome::PullTimedOut { secs });
    }

    if output.success() {
        writeln!(out, "✓ LFS files downloaded successfully")?;
        return Ok(FetchOutcome::Pulled);
    }

    let stderr = output.stderr_text().trim_end().to_string();
    warn!(exit_code = ?output.code, stderr = %stderr, "lfs pull failed");
    writeln!(out, "⚠️  LFS download warning: {stderr}")?;
    Ok(FetchOutcome::PullFailed {
        code: output.code,
        stderr,
    })
}
