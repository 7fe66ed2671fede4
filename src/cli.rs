// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `ciwrap`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ciwrap",
    version,
    about = "Run Go test suites and container provisioning steps for CI.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to an optional config file (TOML).
    ///
    /// When omitted, built-in defaults are used.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CIWRAP_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve settings and print the commands, but don't execute anything.
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run `go test` for a module and write a JUnit report.
    Gotest(GotestArgs),

    /// Clone the infrastructure repo and provision a test container.
    Provision(ProvisionArgs),
}

#[derive(Debug, Clone, clap::Args)]
pub struct GotestArgs {
    /// Module under the package root to test (overrides `[gotest].module`).
    #[arg(long, value_name = "NAME")]
    pub module: Option<String>,

    /// Run `go test` directly instead of through `sudo -E`.
    #[arg(long)]
    pub no_sudo: bool,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ProvisionArgs {
    /// Directory holding the provisioning tree and the clone.
    ///
    /// Default: the current working directory.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Stop after the provisioning playbook.
    #[arg(long)]
    pub skip_tests: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
