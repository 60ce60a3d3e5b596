//! Development-time tracing for the build-tools binaries.
//!
//! Tracing is diagnostics only (`RUST_LOG`, stderr). The console lines a build
//! pipeline reads (progress, warnings, relayed generator output) are written
//! directly by [`crate::lfs`] and [`crate::media_lists`] and do not depend on
//! the filter.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter for `fetch-lfs`: skipped or failed downloads show up as warnings.
pub const FETCH_DEFAULT_FILTER: &str = "warn";

/// Default filter for `generate-media-lists`: silent, so relayed stderr is
/// exactly what the generator wrote.
pub const RELAY_DEFAULT_FILTER: &str = "off";

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` applies.
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=build_tools=debug cargo run --bin generate-media-lists
/// ```
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
