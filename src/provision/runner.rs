// src/provision/runner.rs

use tracing::{info, warn};

use crate::config::ProvisionSettings;
use crate::errors::Result;
use crate::exec::{CommandRunner, CommandSpec};
use crate::fs;
use crate::provision::{assets, commands};

/// Run the whole provisioning flow and return the exit code of the last
/// playbook that ran.
pub async fn run_provision<R>(settings: &ProvisionSettings, runner: &mut R) -> Result<i32>
where
    R: CommandRunner + ?Sized,
{
    fresh_clone(settings, runner).await?;
    assets::copy_assets(settings)?;

    println!("Installing third party ansible roles");
    let galaxy = commands::galaxy_install(settings);
    run_step(runner, &galaxy, settings, "galaxy")
        .await?
        .require_success(&galaxy)?;

    println!("Executing lxc creation and provisioning");
    let provision = commands::playbook(settings, &settings.provision_playbook);
    let code = run_step(runner, &provision, settings, "provision").await?.exit_code;
    if code != 0 {
        warn!(exit_code = code, "provisioning playbook failed; skipping integration tests");
        return Ok(code);
    }

    if !settings.run_integration_tests {
        info!("integration tests disabled");
        return Ok(code);
    }

    println!("{}", settings.tests_message);
    let tests = commands::playbook(settings, &settings.tests_playbook);
    let code = run_step(runner, &tests, settings, "integration-tests").await?.exit_code;
    Ok(code)
}

/// Remove any previous clone, then clone the repository fresh.
pub async fn fresh_clone<R>(settings: &ProvisionSettings, runner: &mut R) -> Result<()>
where
    R: CommandRunner + ?Sized,
{
    if fs::remove_if_exists(&settings.checkout_dir)? {
        info!(dir = ?settings.checkout_dir, "removed stale clone");
    }

    let clone = commands::git_clone(settings);
    run_step(runner, &clone, settings, "clone")
        .await?
        .require_success(&clone)?;
    Ok(())
}

/// Echo and stream one step into `<log_dir>/<name>.log`.
async fn run_step<R>(
    runner: &mut R,
    spec: &CommandSpec,
    settings: &ProvisionSettings,
    name: &str,
) -> Result<crate::exec::CommandOutcome>
where
    R: CommandRunner + ?Sized,
{
    println!("CMD: {}", spec.display());
    let log = settings.log_dir.join(format!("{name}.log"));
    Ok(runner.stream(spec, &log).await?)
}
