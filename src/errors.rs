// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

use crate::exec::ExecError;

#[derive(Error, Debug)]
pub enum CiwrapError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Exec(#[from] ExecError),

    /// A setup command launched but exited non-zero.
    #[error("`{command}` failed with exit code {exit_code}")]
    CommandFailed { command: String, exit_code: i32 },

    #[error("required path missing: {0}")]
    MissingPath(PathBuf),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, CiwrapError>;

/// Exit code used for every failure that happens outside the main command.
pub const SETUP_FAILURE_EXIT_CODE: i32 = 1;
