// src/logging.rs

//! Diagnostics for `ciwrap` via `tracing`.
//!
//! stdout belongs to the wrapped commands: the CI console shows the same
//! merged stream that lands in the capture file (and, for `gotest`, in the
//! input to `go-junit-report`). Anything `ciwrap` itself wants to say at
//! log level therefore goes to stderr, never stdout.
//!
//! Filter selection:
//! 1. `--log-level` applies one level to everything.
//! 2. `CIWRAP_LOG` accepts a level (`debug`) or filter directives
//!    (`info,ciwrap::exec=trace`).
//! 3. Otherwise `info`.

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "CIWRAP_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Install the global subscriber, writing to stderr.
///
/// Fails if a subscriber is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = match cli_level {
        Some(lvl) => EnvFilter::new(directive_for(lvl)),
        None => filter_from_env_value(std::env::var(LOG_ENV_VAR).ok().as_deref()),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("initialising logging: {e}"))?;

    Ok(())
}

fn directive_for(lvl: LogLevel) -> &'static str {
    match lvl {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}

/// Build the filter from the raw `CIWRAP_LOG` value.
///
/// Unset, blank or unparsable values fall back to `info` so a typo in a CI
/// job's environment never stops the wrapped command from running.
fn filter_from_env_value(value: Option<&str>) -> EnvFilter {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| EnvFilter::try_new(v.to_lowercase()).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}
