#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use ciwrap::config::{GoTestSection, GoTestSettings, ProvisionSection, ProvisionSettings};

/// Builder for `GoTestSettings` rooted in a scratch workspace.
pub struct GoTestSettingsBuilder {
    section: GoTestSection,
    workspace: PathBuf,
    gopath: Option<PathBuf>,
}

impl GoTestSettingsBuilder {
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self {
            section: GoTestSection {
                module: Some("mistify-agent".to_string()),
                sudo: false,
                ..GoTestSection::default()
            },
            workspace: workspace.into(),
            gopath: None,
        }
    }

    pub fn go_binary(mut self, go: impl AsRef<Path>) -> Self {
        self.section.go_binary = Some(go.as_ref().to_string_lossy().into_owned());
        self
    }

    pub fn junit_binary(mut self, bin: impl AsRef<Path>) -> Self {
        self.section.junit_binary = Some(bin.as_ref().to_string_lossy().into_owned());
        self
    }

    pub fn sudo(mut self, val: bool) -> Self {
        self.section.sudo = val;
        self
    }

    pub fn gopath(mut self, gopath: impl Into<PathBuf>) -> Self {
        self.gopath = Some(gopath.into());
        self
    }

    pub fn build(self) -> GoTestSettings {
        let workspace = self.workspace.to_string_lossy().into_owned();
        let gopath = self
            .gopath
            .unwrap_or_else(|| self.workspace.join("gopath"))
            .to_string_lossy()
            .into_owned();

        GoTestSettings::resolve(&self.section, move |key: &str| match key {
            "WORKSPACE" => Some(workspace.clone()),
            "GOPATH" => Some(gopath.clone()),
            "HOME" => Some("/nonexistent-home".to_string()),
            _ => None,
        })
        .expect("Failed to resolve gotest settings from builder")
    }
}

/// Builder for `ProvisionSettings` rooted in a scratch directory.
pub struct ProvisionSettingsBuilder {
    section: ProvisionSection,
    root: PathBuf,
}

impl ProvisionSettingsBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            section: ProvisionSection::default(),
            root: root.into(),
        }
    }

    pub fn run_integration_tests(mut self, val: bool) -> Self {
        self.section.run_integration_tests = val;
        self
    }

    pub fn tests_message(mut self, message: impl Into<String>) -> Self {
        self.section.tests_message = message.into();
        self
    }

    pub fn remote(mut self, remote: impl Into<String>) -> Self {
        self.section.remote = Some(remote.into());
        self
    }

    pub fn git(mut self, git: impl Into<String>) -> Self {
        self.section.git = git.into();
        self
    }

    pub fn build(self) -> ProvisionSettings {
        ProvisionSettings::resolve(&self.section, self.root)
    }
}

/// Populate `checkout_dir` the way a clone of the infrastructure repo looks:
/// the given roles (each with `tasks/main.yml`), `vars/vaulted_vars` and
/// `requirements.yml`.
pub fn populate_infra_clone(checkout_dir: &Path, roles: &[&str]) {
    for role in roles {
        let tasks = checkout_dir.join("roles").join(role).join("tasks");
        fs::create_dir_all(&tasks).expect("create role dir");
        fs::write(tasks.join("main.yml"), format!("# role {role}\n")).expect("write role");
    }
    fs::create_dir_all(checkout_dir.join("vars")).expect("create vars dir");
    fs::write(checkout_dir.join("vars/vaulted_vars"), "secret: 1\n").expect("write vars");
    fs::write(checkout_dir.join("requirements.yml"), "- src: geerlingguy.go\n")
        .expect("write requirements");
}

/// Write an executable `#!/bin/sh` script into `dir` and return its path.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    let mut perms = fs::metadata(&path).expect("script metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod script");
    path
}
