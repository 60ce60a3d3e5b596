//! Build-step helpers for fetching large-file assets and generating media lists.
//!
//! Two independent entry points share this library:
//!
//! - **[`lfs`]**: best-effort `git lfs pull`. Every failure is reported on the
//!   console and absorbed so an optional asset download never blocks a build.
//! - **[`media_lists`]**: a faithful relay around the external media-list
//!   generator. The child's streams and exit code are passed through unchanged.
//!
//! Side effects (subprocesses, repository detection, config files) live in
//! [`io`]; the orchestration modules take a [`io::process::ProcessRunner`] so
//! tests can script every external command.

pub mod exit_codes;
pub mod io;
pub mod lfs;
pub mod logging;
pub mod media_lists;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
