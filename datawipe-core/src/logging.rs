//! Shared logging setup for the wipe binaries.

use crate::Result;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// Maps CLI verbosity flags to a tracing level.
///
/// `quiet` wins over any `-v` count.
pub fn level_for(verbose: u8, quiet: bool) -> tracing::Level {
    match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::WARN,
        (false, 1) => tracing::Level::INFO,
        (false, 2) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    }
}

/// Builds the event filter for the given flags.
///
/// Without `-v` or `-q`, `RUST_LOG` directives apply on top of the WARN
/// default. An explicit flag overrides `RUST_LOG`.
pub fn filter_for(verbose: u8, quiet: bool) -> EnvFilter {
    let level = level_for(verbose, quiet);
    if quiet || verbose > 0 {
        return EnvFilter::new(level.as_str());
    }

    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy()
}

/// Initializes structured logging on stderr.
///
/// The default level is WARN so that `wipe-index` stays silent on success
/// and `wipe-tables` shows only its own progress lines. See [`filter_for`]
/// for how `RUST_LOG` is applied.
///
/// # Example
/// ```rust,no_run
/// use datawipe_core::logging::init_logging;
///
/// // Initialize at INFO level
/// init_logging(1, false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter_for(verbose, quiet))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .map_err(|e| {
            crate::error::WipeError::configuration(format!(
                "Failed to initialize logging: {}",
                e
            ))
        })?;

    Ok(())
}
