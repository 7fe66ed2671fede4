// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod gotest;
pub mod logging;
pub mod provision;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::{CliArgs, Command, GotestArgs, ProvisionArgs};
use crate::config::{load_or_default, process_env, ConfigFile, GoTestSettings, ProvisionSettings};
use crate::exec::{CommandSpec, ProcessRunner};

/// High-level entry point used by `main.rs`.
///
/// Loads the config, resolves the settings for the chosen subcommand once,
/// then runs that flow with the real process runner. Returns the exit code
/// the process should end with.
pub async fn run(args: CliArgs) -> Result<i32> {
    let cfg = load_or_default(args.config.as_deref()).with_context(|| match &args.config {
        Some(path) => format!("loading config {:?}", path),
        None => "building default config".to_string(),
    })?;

    match &args.command {
        Command::Gotest(gotest_args) => {
            let settings = gotest_settings(&cfg, gotest_args, process_env)?;
            if args.dry_run {
                print_dry_run("gotest", &format!("{settings:#?}"), &gotest::commands::plan(&settings));
                return Ok(0);
            }
            info!(module = %settings.module, workspace = ?settings.workspace, "running gotest");
            Ok(gotest::run_gotest(&settings, &mut ProcessRunner::new()).await?)
        }
        Command::Provision(provision_args) => {
            let settings = provision_settings(&cfg, provision_args)?;
            if args.dry_run {
                print_dry_run(
                    "provision",
                    &format!("{settings:#?}"),
                    &provision::commands::plan(&settings),
                );
                return Ok(0);
            }
            info!(remote = %settings.remote, root = ?settings.root, "running provision");
            Ok(provision::run_provision(&settings, &mut ProcessRunner::new()).await?)
        }
    }
}

/// Apply CLI overrides to `[gotest]` and resolve against `env`
/// (`process_env` outside of tests).
pub fn gotest_settings<F>(cfg: &ConfigFile, args: &GotestArgs, env: F) -> Result<GoTestSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let mut section = cfg.gotest.clone();
    if let Some(module) = &args.module {
        section.module = Some(module.clone());
    }
    if args.no_sudo {
        section.sudo = false;
    }
    Ok(GoTestSettings::resolve(&section, env)?)
}

/// Apply CLI overrides to `[provision]` and resolve against the root dir.
pub fn provision_settings(cfg: &ConfigFile, args: &ProvisionArgs) -> Result<ProvisionSettings> {
    let mut section = cfg.provision.clone();
    if args.skip_tests {
        section.run_integration_tests = false;
    }
    let root = match &args.root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("resolving current directory")?,
    };
    Ok(ProvisionSettings::resolve(&section, root))
}

/// Simple dry-run output: resolved settings and the planned commands.
fn print_dry_run(flow: &str, settings: &str, plan: &[CommandSpec]) {
    println!("ciwrap {flow} dry-run");
    println!("{settings}");
    println!();

    println!("commands ({}):", plan.len());
    for spec in plan {
        println!("  - {}", spec.display());
        if let Some(cwd) = &spec.cwd {
            println!("      cwd: {}", cwd.display());
        }
    }

    debug!("dry-run complete (no execution)");
}
