//! `generate-media-lists`: run the media-list generator and mirror its result.
//!
//! The generator's stdout and stderr are relayed unchanged and its exit code
//! becomes this process's exit code.

use std::io;
use std::path::PathBuf;

use build_tools::exit_codes;
use build_tools::io::config::load_project_config;
use build_tools::io::process::SystemRunner;
use build_tools::logging;
use build_tools::media_lists::run_generator;
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "generate-media-lists",
    version,
    about = "Generate media list manifests via the external generator script"
)]
struct Cli {}

fn main() {
    let _cli = Cli::parse();
    logging::init(logging::RELAY_DEFAULT_FILTER);

    let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = match load_project_config(&root) {
        Ok(cfg) => cfg.generator,
        Err(err) => {
            eprintln!("❌ Error: {err:#}");
            std::process::exit(exit_codes::FAILURE);
        }
    };

    let stdout = io::stdout();
    let stderr = io::stderr();
    let code = run_generator(
        &root,
        &config,
        &SystemRunner,
        &mut stdout.lock(),
        &mut stderr.lock(),
    );
    std::process::exit(code);
}
