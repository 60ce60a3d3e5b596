//! Relay around the external media-list generator for `generate-media-lists`.
//!
//! The generator runs in another runtime (Node.js by default). Its stdout and
//! stderr are passed through unmodified and its exit code becomes ours, so the
//! calling pipeline reacts to generator failures exactly as if it had run the
//! script directly.

use std::io::Write;
use std::path::Path;

use anyhow::{Result, bail};
use tracing::{debug, instrument};

use crate::exit_codes;
use crate::io::config::GeneratorConfig;
use crate::io::process::{CommandSpec, ProcessRunner};

/// Run the generator in `root` and relay its output to `out` / `err`.
///
/// Returns the generator's exit code, or [`exit_codes::FAILURE`] when the
/// generator could not be run (or ended without an exit code). Invocation
/// failures are reported on `err` as `❌ Error: ...`.
pub fn run_generator<R: ProcessRunner, O: Write, E: Write>(
    root: &Path,
    config: &GeneratorConfig,
    runner: &R,
    out: &mut O,
    err: &mut E,
) -> i32 {
    match relay(root, config, runner, out, err) {
        Ok(code) => code,
        Err(error) => {
            debug!(err = %format!("{error:#}"), "generator invocation failed");
            // Nowhere left to report a console write failure.
            let _ = writeln!(err, "❌ Error: {error:#}");
            exit_codes::FAILURE
        }
    }
}

#[instrument(skip_all, fields(root = %root.display()))]
fn relay<R: ProcessRunner, O: Write, E: Write>(
    root: &Path,
    config: &GeneratorConfig,
    runner: &R,
    out: &mut O,
    err: &mut E,
) -> Result<i32> {
    writeln!(out, "📋 Generating media lists...")?;
    out.flush()?;

    let spec = CommandSpec::from_argv(&config.command, root)?.with_timeout(config.timeout());
    let output = runner.run(&spec)?;

    write_relayed(out, &output.stdout)?;
    write_relayed(err, &output.stderr)?;

    if let Some(limit) = output.timed_out {
        bail!("{} timed out after {}s", spec.display(), limit.as_secs());
    }

    match output.code {
        Some(code) => {
            debug!(exit_code = code, "generator finished");
            Ok(code)
        }
        None => {
            debug!("generator terminated by signal");
            Ok(exit_codes::FAILURE)
        }
    }
}

/// Write captured child output verbatim, terminated by a newline.
fn write_relayed<W: Write>(dest: &mut W, captured: &[u8]) -> Result<()> {
    if captured.is_empty() {
        return Ok(());
    }
    dest.write_all(captured)?;
    if !captured.ends_with(b"\n") {
        dest.write_all(b"\n")?;
    }
    dest.flush()?;
    Ok(())
}
