// tests/provision_flow.rs

mod common;
use crate::common::{init_tracing, with_timeout};

use std::error::Error;
use std::fs;
use std::path::Path;

use ciwrap::errors::CiwrapError;
use ciwrap::provision::{copy_assets, fresh_clone, run_provision};
use ciwrap_test_utils::builders::{populate_infra_clone, ProvisionSettingsBuilder};
use ciwrap_test_utils::fake_runner::{CallKind, FakeReply, FakeRunner, RecordedCall};

type TestResult = Result<(), Box<dyn Error>>;

/// `git clone` lays out a clone with two roles; everything else succeeds.
fn cloning_responder(call: &RecordedCall) -> FakeReply {
    if call.spec.args.first().map(String::as_str) == Some("clone") {
        let dest = call.spec.args.last().expect("clone destination");
        populate_infra_clone(Path::new(dest), &["common", "lxc-host"]);
    }
    FakeReply::ok()
}

#[tokio::test]
async fn full_run_executes_every_step_in_order() -> TestResult {
    with_timeout(async {
        init_tracing();
        let tmp = tempfile::tempdir()?;
        let settings = ProvisionSettingsBuilder::new(tmp.path()).build();
        let mut runner = FakeRunner::with_responder(cloning_responder);

        let code = run_provision(&settings, &mut runner).await?;

        assert_eq!(code, 0);
        assert_eq!(
            runner.programs(),
            vec!["git", "ansible-galaxy", "ansible-playbook", "ansible-playbook"]
        );
        let lines = runner.command_lines();
        assert_eq!(lines[2], "ansible-playbook provision-container.yml");
        assert_eq!(lines[3], "ansible-playbook execute-tests.yml");

        let calls = runner.calls();
        let calls = calls.lock().unwrap();
        assert_eq!(calls[2].spec.cwd.as_deref(), Some(settings.provisioning_dir.as_path()));
        assert_eq!(
            calls[3].kind,
            CallKind::Stream { capture: settings.log_dir.join("integration-tests.log") }
        );

        let roles = &settings.roles_dir;
        assert!(roles.join("common/tasks/main.yml").is_file());
        assert!(roles.join("lxc-host/tasks/main.yml").is_file());
        assert_eq!(fs::read_to_string(settings.dest_vars_file())?, "secret: 1\n");
        assert_eq!(
            fs::read_to_string(settings.dest_requirements())?,
            "- src: geerlingguy.go\n"
        );
        Ok(())
    })
    .await
}

#[tokio::test]
async fn stale_clone_is_removed_before_cloning() -> TestResult {
    with_timeout(async {
        init_tracing();
        let tmp = tempfile::tempdir()?;
        let settings = ProvisionSettingsBuilder::new(tmp.path()).build();

        fs::create_dir_all(settings.checkout_dir.join("roles/obsolete"))?;
        fs::write(settings.checkout_dir.join("stale.txt"), "old")?;

        let saw_clean_dir = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = saw_clean_dir.clone();
        let mut runner = FakeRunner::with_responder(move |call| {
            let dest = Path::new(call.spec.args.last().expect("clone destination"));
            flag.store(!dest.exists(), std::sync::atomic::Ordering::SeqCst);
            populate_infra_clone(dest, &["fresh"]);
            FakeReply::ok()
        });

        fresh_clone(&settings, &mut runner).await?;

        assert!(saw_clean_dir.load(std::sync::atomic::Ordering::SeqCst));
        assert!(!settings.checkout_dir.join("stale.txt").exists());
        assert!(!settings.checkout_dir.join("roles/obsolete").exists());
        assert!(settings.checkout_dir.join("roles/fresh").is_dir());
        Ok(())
    })
    .await
}

#[tokio::test]
async fn clone_failure_stops_the_flow() -> TestResult {
    with_timeout(async {
        init_tracing();
        let tmp = tempfile::tempdir()?;
        let settings = ProvisionSettingsBuilder::new(tmp.path()).build();
        let mut runner = FakeRunner::with_responder(|_| FakeReply::exit(128, "fatal: repository not found\n"));

        let err = run_provision(&settings, &mut runner).await.unwrap_err();

        assert!(matches!(err, CiwrapError::CommandFailed { exit_code: 128, .. }), "{err:?}");
        assert_eq!(runner.programs(), vec!["git"]);
        assert_eq!(
            fs::read_to_string(settings.log_dir.join("clone.log"))?,
            "fatal: repository not found\n"
        );
        Ok(())
    })
    .await
}

#[tokio::test]
async fn galaxy_failure_is_a_setup_failure() -> TestResult {
    with_timeout(async {
        init_tracing();
        let tmp = tempfile::tempdir()?;
        let settings = ProvisionSettingsBuilder::new(tmp.path()).build();
        let mut runner = FakeRunner::with_responder(|call| {
            if call.spec.program == "ansible-galaxy" {
                FakeReply::exit(2, "")
            } else {
                cloning_responder(call)
            }
        });

        let err = run_provision(&settings, &mut runner).await.unwrap_err();

        match err {
            CiwrapError::CommandFailed { command, exit_code } => {
                assert!(command.starts_with("ansible-galaxy install -f -r"));
                assert_eq!(exit_code, 2);
            }
            other => panic!("expected CommandFailed, got {other:?}"),
        }
        assert_eq!(runner.programs(), vec!["git", "ansible-galaxy"]);
        Ok(())
    })
    .await
}

#[tokio::test]
async fn failed_provisioning_skips_tests_and_returns_its_code() -> TestResult {
    with_timeout(async {
        init_tracing();
        let tmp = tempfile::tempdir()?;
        let settings = ProvisionSettingsBuilder::new(tmp.path()).build();
        let mut runner = FakeRunner::with_responder(|call| {
            if call.spec.args.first().map(String::as_str) == Some("provision-container.yml") {
                FakeReply::exit(4, "PLAY RECAP failed=1\n")
            } else {
                cloning_responder(call)
            }
        });

        let code = run_provision(&settings, &mut runner).await?;

        assert_eq!(code, 4);
        assert_eq!(runner.command_lines().len(), 3);
        assert_eq!(
            fs::read_to_string(settings.log_dir.join("provision.log"))?,
            "PLAY RECAP failed=1\n"
        );
        Ok(())
    })
    .await
}

#[tokio::test]
async fn integration_test_exit_code_is_the_result() -> TestResult {
    with_timeout(async {
        init_tracing();
        let tmp = tempfile::tempdir()?;
        let settings = ProvisionSettingsBuilder::new(tmp.path())
            .tests_message("Executing libvirt kvm tests")
            .build();
        assert_eq!(settings.tests_message, "Executing libvirt kvm tests");
        let mut runner = FakeRunner::with_responder(|call| {
            if call.spec.args.first().map(String::as_str) == Some("execute-tests.yml") {
                FakeReply::exit(1, "")
            } else {
                cloning_responder(call)
            }
        });

        assert_eq!(run_provision(&settings, &mut runner).await?, 1);
        Ok(())
    })
    .await
}

#[tokio::test]
async fn skipping_tests_stops_after_provisioning() -> TestResult {
    with_timeout(async {
        init_tracing();
        let tmp = tempfile::tempdir()?;
        let settings = ProvisionSettingsBuilder::new(tmp.path())
            .run_integration_tests(false)
            .build();
        let mut runner = FakeRunner::with_responder(cloning_responder);

        assert_eq!(run_provision(&settings, &mut runner).await?, 0);
        assert_eq!(runner.programs(), vec!["git", "ansible-galaxy", "ansible-playbook"]);
        Ok(())
    })
    .await
}

#[tokio::test]
async fn playbook_launch_failure_is_fatal() -> TestResult {
    with_timeout(async {
        init_tracing();
        let tmp = tempfile::tempdir()?;
        let settings = ProvisionSettingsBuilder::new(tmp.path()).build();
        let mut runner = FakeRunner::with_responder(|call| {
            if call.spec.program == "ansible-playbook" {
                FakeReply::LaunchFailure
            } else {
                cloning_responder(call)
            }
        });

        let err = run_provision(&settings, &mut runner).await.unwrap_err();
        assert!(matches!(err, CiwrapError::Exec(ref e) if e.is_launch()), "{err:?}");
        Ok(())
    })
    .await
}

#[test]
fn copy_assets_replaces_existing_roles() -> TestResult {
    init_tracing();
    let tmp = tempfile::tempdir()?;
    let settings = ProvisionSettingsBuilder::new(tmp.path()).build();
    populate_infra_clone(&settings.checkout_dir, &["common"]);

    let old_role = settings.roles_dir.join("common");
    fs::create_dir_all(&old_role)?;
    fs::write(old_role.join("leftover.yml"), "old")?;
    let local_role = settings.roles_dir.join("local-only");
    fs::create_dir_all(&local_role)?;

    let copied = copy_assets(&settings)?;

    assert_eq!(copied, vec!["common".to_string()]);
    assert!(!old_role.join("leftover.yml").exists());
    assert!(old_role.join("tasks/main.yml").is_file());
    assert!(local_role.is_dir(), "roles not in the clone are left alone");
    Ok(())
}

#[test]
fn copy_assets_requires_the_vars_file() -> TestResult {
    init_tracing();
    let tmp = tempfile::tempdir()?;
    let settings = ProvisionSettingsBuilder::new(tmp.path()).build();
    populate_infra_clone(&settings.checkout_dir, &["common"]);
    fs::remove_file(settings.source_vars_file())?;

    match copy_assets(&settings) {
        Err(CiwrapError::MissingPath(path)) => assert_eq!(path, settings.source_vars_file()),
        other => panic!("expected MissingPath, got {other:?}"),
    }
    Ok(())
}

#[test]
fn copy_assets_requires_the_roles_dir() -> TestResult {
    init_tracing();
    let tmp = tempfile::tempdir()?;
    let settings = ProvisionSettingsBuilder::new(tmp.path()).build();
    fs::create_dir_all(&settings.checkout_dir)?;

    assert!(matches!(copy_assets(&settings), Err(CiwrapError::MissingPath(_))));
    Ok(())
}
