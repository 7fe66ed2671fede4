// src/exec/backend.rs

//! Pluggable command runner abstraction.
//!
//! The gotest and provision flows talk to a `CommandRunner` instead of
//! spawning processes directly. Production code uses [`ProcessRunner`];
//! tests provide a runner that records the commands and returns scripted
//! outcomes without touching the OS.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use crate::exec::{run_captured, run_streaming, CommandOutcome, CommandSpec, ExecError};

pub type ExecFuture<'a> =
    Pin<Box<dyn Future<Output = Result<CommandOutcome, ExecError>> + Send + 'a>>;

/// Trait abstracting how external commands are executed.
pub trait CommandRunner: Send {
    /// Run with merged output streamed to the console and `capture`.
    fn stream<'a>(&'a mut self, spec: &'a CommandSpec, capture: &'a Path) -> ExecFuture<'a>;

    /// Run to completion with stdout buffered in the outcome.
    fn capture<'a>(
        &'a mut self,
        spec: &'a CommandSpec,
        stdin: Option<&'a Path>,
        merge_stderr: bool,
    ) -> ExecFuture<'a>;
}

/// Real runner that spawns OS processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ProcessRunner {
    fn stream<'a>(&'a mut self, spec: &'a CommandSpec, capture: &'a Path) -> ExecFuture<'a> {
        Box::pin(run_streaming(spec, capture))
    }

    fn capture<'a>(
        &'a mut self,
        spec: &'a CommandSpec,
        stdin: Option<&'a Path>,
        merge_stderr: bool,
    ) -> ExecFuture<'a> {
        Box::pin(run_captured(spec, stdin, merge_stderr))
    }
}
