// src/gotest/runner.rs

use tracing::{info, warn};

use crate::config::GoTestSettings;
use crate::errors::{CiwrapError, Result};
use crate::exec::CommandRunner;
use crate::fs;
use crate::gotest::commands;

/// Run the whole gotest flow and return `go test`'s exit code.
///
/// Any failure other than `go test` itself exiting non-zero is returned as
/// an error (dependency fetch, launching `go test`, report conversion,
/// writing the report).
pub async fn run_gotest<R>(settings: &GoTestSettings, runner: &mut R) -> Result<i32>
where
    R: CommandRunner + ?Sized,
{
    if !settings.workspace.is_dir() {
        return Err(CiwrapError::MissingPath(settings.workspace.clone()));
    }

    let go = locate_go(settings, runner).await;
    println!("Using GOPATH: {}", settings.gopath.display());
    println!("Using go binary: {go}");

    println!("Executing gotest...");
    fetch_dependencies(settings, &go, runner).await?;

    let test_code = run_tests(settings, &go, runner).await?;
    convert_report(settings, runner).await?;

    println!("Finished... Exit( {test_code} )");
    Ok(test_code)
}

/// Resolve the go binary: configured path, else `which go`, else the
/// fallback path.
pub async fn locate_go<R>(settings: &GoTestSettings, runner: &mut R) -> String
where
    R: CommandRunner + ?Sized,
{
    if let Some(go) = &settings.go_binary {
        return go.clone();
    }

    let spec = commands::which_go();
    match runner.capture(&spec, None, false).await {
        Ok(outcome) if outcome.success() && !outcome.text().is_empty() => outcome.text(),
        Ok(outcome) => {
            println!("Go binary not found on path using default...");
            info!(exit_code = outcome.exit_code, "which go found nothing");
            settings.fallback_go_binary.clone()
        }
        Err(e) => {
            println!("Go binary not found on path using default...");
            warn!(error = %e, "could not run `which go`");
            settings.fallback_go_binary.clone()
        }
    }
}

async fn fetch_dependencies<R>(settings: &GoTestSettings, go: &str, runner: &mut R) -> Result<()>
where
    R: CommandRunner + ?Sized,
{
    let spec = commands::fetch_deps(settings, go);
    println!("CMD: {}", spec.display());

    let outcome = runner.capture(&spec, None, true).await?;
    let output = String::from_utf8_lossy(outcome.bytes()).into_owned();
    if !outcome.success() {
        println!("error> {output} <");
    } else if !output.is_empty() {
        println!("{output}");
    }
    outcome.require_success(&spec)?;
    Ok(())
}

async fn run_tests<R>(settings: &GoTestSettings, go: &str, runner: &mut R) -> Result<i32>
where
    R: CommandRunner + ?Sized,
{
    let spec = commands::go_test(settings, go);
    println!("CMD: {}", spec.display());

    let outcome = runner.stream(&spec, &settings.temp_report).await?;
    if !outcome.success() {
        warn!(exit_code = outcome.exit_code, "go test reported failures");
    }
    Ok(outcome.exit_code)
}

async fn convert_report<R>(settings: &GoTestSettings, runner: &mut R) -> Result<()>
where
    R: CommandRunner + ?Sized,
{
    let spec = commands::junit_report(settings);
    info!(cmd = %spec.display(), input = ?settings.temp_report, "converting test output");

    let outcome = runner
        .capture(&spec, Some(&settings.temp_report), false)
        .await?
        .require_success(&spec)?;

    println!("Writing test results to {}", settings.junit_report.display());
    fs::write_file(&settings.junit_report, outcome.bytes())?;
    Ok(())
}
