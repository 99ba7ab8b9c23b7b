//! Diagnostic logging setup.

use anyhow::{Result, anyhow};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::{fmt, prelude::*};

/// Installs the global tracing subscriber, writing to stderr.
///
/// `-v` flags pick the level (info, debug, trace); without them `RUST_LOG`
/// applies, defaulting to warnings only. `-q` limits output to errors.
pub(crate) fn init(verbose: u8, quiet: bool) -> Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose > 1),
        )
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}
