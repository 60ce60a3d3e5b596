//! Stable exit codes for the build-tools binaries.

/// Step completed (or was skipped as a tolerated condition).
pub const OK: i32 = 0;
/// Step could not run: invalid config, spawn failure, or a child without an exit code.
pub const FAILURE: i32 = 1;
