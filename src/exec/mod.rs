// src/exec/mod.rs

//! Process execution layer.
//!
//! Every external tool `ciwrap` drives (go, git, ansible, ...) goes through
//! this module, using `tokio::process::Command` underneath.
//!
//! - [`command`] holds the typed [`CommandSpec`] builder.
//! - [`stream`] runs a command with stdout+stderr merged, mirrored live to
//!   the console and to a capture file.
//! - [`capture`] runs short setup commands and buffers their output.
//! - [`backend`] provides the [`CommandRunner`] seam and the production
//!   [`ProcessRunner`]; tests swap in a fake runner.

pub mod backend;
pub mod capture;
pub mod command;
pub mod stream;

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

pub use backend::{CommandRunner, ProcessRunner};
pub use capture::run_captured;
pub use command::CommandSpec;
pub use stream::run_streaming;

/// Failure to run a command at all, as opposed to a command that ran and
/// exited non-zero (which is reported through [`CommandOutcome`]).
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("capture file {path:?}: {source}")]
    Capture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error while running `{program}`: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl ExecError {
    pub fn is_launch(&self) -> bool {
        matches!(self, ExecError::Launch { .. })
    }
}

/// Where the output of a finished command ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapturedOutput {
    /// Output held in memory (captured runs).
    Buffered(Vec<u8>),
    /// Output written to a capture file (streamed runs).
    File(PathBuf),
}

/// Result of a command that launched and ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub exit_code: i32,
    pub output: CapturedOutput,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Buffered bytes, or an empty slice for file-backed output.
    pub fn bytes(&self) -> &[u8] {
        match &self.output {
            CapturedOutput::Buffered(bytes) => bytes,
            CapturedOutput::File(_) => &[],
        }
    }

    /// Buffered output decoded lossily and trimmed.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(self.bytes()).trim().to_string()
    }
}

/// Map an exit status to a plain code.
///
/// Signal deaths follow the shell convention `128 + signal` on Unix; anything
/// else without a code becomes -1.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    -1
}

impl CommandOutcome {
    /// Turn a non-zero exit into a setup failure for `spec`.
    pub fn require_success(self, spec: &CommandSpec) -> crate::errors::Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(crate::errors::CiwrapError::CommandFailed {
                command: spec.display(),
                exit_code: self.exit_code,
            })
        }
    }
}
