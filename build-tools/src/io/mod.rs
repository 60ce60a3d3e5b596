//! I/O helpers for the build steps.

pub mod config;
pub mod git;
pub mod process;
