// src/provision/commands.rs

//! Command lines used by the provision flow.

use crate::config::ProvisionSettings;
use crate::exec::CommandSpec;

/// `git clone --branch <branch> <remote> <checkout_dir>`
pub fn git_clone(settings: &ProvisionSettings) -> CommandSpec {
    CommandSpec::new(&settings.git)
        .arg("clone")
        .arg("--branch")
        .arg(&settings.branch)
        .arg(&settings.remote)
        .path_arg(&settings.checkout_dir)
        .current_dir(&settings.root)
}

/// `ansible-galaxy install -f -r <checkout>/requirements.yml -p <roles_dir>`
pub fn galaxy_install(settings: &ProvisionSettings) -> CommandSpec {
    CommandSpec::new(&settings.ansible_galaxy)
        .args(["install", "-f", "-r"])
        .path_arg(settings.source_requirements())
        .arg("-p")
        .path_arg(&settings.roles_dir)
        .current_dir(&settings.root)
}

/// `ansible-playbook <playbook>`, run from the provisioning directory.
pub fn playbook(settings: &ProvisionSettings, playbook: &str) -> CommandSpec {
    CommandSpec::new(&settings.ansible_playbook)
        .arg(playbook)
        .current_dir(&settings.provisioning_dir)
}

/// The commands a run would execute, for `--dry-run`.
pub fn plan(settings: &ProvisionSettings) -> Vec<CommandSpec> {
    let mut plan = vec![
        git_clone(settings),
        galaxy_install(settings),
        playbook(settings, &settings.provision_playbook),
    ];
    if settings.run_integration_tests {
        plan.push(playbook(settings, &settings.tests_playbook));
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProvisionSection;

    #[test]
    fn clone_targets_branch_and_checkout_dir() {
        let settings = ProvisionSettings::resolve(&ProvisionSection::default(), "/job");
        assert_eq!(
            git_clone(&settings).display(),
            "git clone --branch master git@github.com:mistifyio/infrastructure-jenkins-slave /job/infrastructure-jenkins-slave"
        );
    }

    #[test]
    fn galaxy_installs_into_roles_dir() {
        let settings = ProvisionSettings::resolve(&ProvisionSection::default(), "/job");
        assert_eq!(
            galaxy_install(&settings).display(),
            "ansible-galaxy install -f -r /job/infrastructure-jenkins-slave/requirements.yml -p /job/provisioning/roles"
        );
    }

    #[test]
    fn plan_drops_tests_playbook_when_disabled() {
        let section = ProvisionSection {
            run_integration_tests: false,
            ..ProvisionSection::default()
        };
        let settings = ProvisionSettings::resolve(&section, "/job");
        let plan = plan(&settings);
        assert_eq!(plan.len(), 3);
        assert_eq!(plan[2].display(), "ansible-playbook provision-container.yml");
    }
}
