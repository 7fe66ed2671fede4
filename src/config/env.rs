// src/config/env.rs

//! Startup-time settings resolution.
//!
//! Environment variables are read exactly once, here, through a lookup
//! function. Everything downstream receives a plain settings struct, so the
//! flows never touch `std::env` themselves and tests can feed a fake
//! environment.

use std::path::{Path, PathBuf};

use crate::config::model::{GoTestSection, ProvisionSection};
use crate::errors::{CiwrapError, Result};

/// Lookup against the real process environment.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Value of `key` if set and non-empty, else `$HOME/<fallback>`.
fn env_or_home<F>(env: &F, key: &str, fallback: &str) -> Result<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = env(key).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(value));
    }
    let home = env("HOME").filter(|v| !v.is_empty()).ok_or_else(|| {
        CiwrapError::ConfigError(format!("{key} is not set and HOME is unavailable"))
    })?;
    Ok(Path::new(&home).join(fallback))
}

/// Everything the gotest flow needs, resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoTestSettings {
    pub workspace: PathBuf,
    pub gopath: PathBuf,
    pub module: String,
    /// `./src/<package_root>/<module>/...`
    pub package: String,
    pub go_binary: Option<String>,
    pub fallback_go_binary: String,
    pub junit_binary: String,
    pub junit_report: PathBuf,
    pub temp_report: PathBuf,
    pub sudo: bool,
    pub timeout: String,
    pub parallelism: u32,
}

impl GoTestSettings {
    /// Combine the `[gotest]` section with `WORKSPACE`, `GOPATH` and `HOME`
    /// from `env`.
    ///
    /// - `WORKSPACE` unset/empty → `$HOME/gotest_workspace`
    /// - `GOPATH` unset/empty → `$HOME/go`
    pub fn resolve<F>(section: &GoTestSection, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let module = section
            .module
            .clone()
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| {
                CiwrapError::ConfigError(
                    "no module to test; set [gotest].module or pass --module".to_string(),
                )
            })?;

        let workspace = env_or_home(&env, "WORKSPACE", "gotest_workspace")?;
        let gopath = env_or_home(&env, "GOPATH", "go")?;

        let junit_binary = section.junit_binary.clone().unwrap_or_else(|| {
            gopath
                .join("bin")
                .join("go-junit-report")
                .to_string_lossy()
                .into_owned()
        });

        let package = format!(
            "./src/{}/{}/...",
            section.package_root.trim_end_matches('/'),
            module
        );

        Ok(Self {
            junit_report: workspace.join("test_results.xml"),
            temp_report: workspace.join("temp_results.txt"),
            workspace,
            gopath,
            module,
            package,
            go_binary: section.go_binary.clone(),
            fallback_go_binary: section.fallback_go_binary.clone(),
            junit_binary,
            sudo: section.sudo,
            timeout: section.timeout.clone(),
            parallelism: section.parallelism,
        })
    }
}

/// Everything the provision flow needs, resolved against a root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionSettings {
    pub root: PathBuf,
    pub repo_name: String,
    pub remote: String,
    pub branch: String,
    pub checkout_dir: PathBuf,
    pub provisioning_dir: PathBuf,
    pub roles_dir: PathBuf,
    pub log_dir: PathBuf,
    pub provision_playbook: String,
    pub tests_playbook: String,
    pub tests_message: String,
    pub run_integration_tests: bool,
    pub git: String,
    pub ansible_galaxy: String,
    pub ansible_playbook: String,
}

impl ProvisionSettings {
    pub fn resolve(section: &ProvisionSection, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let provisioning_dir = root.join(&section.provisioning_dir);

        Self {
            remote: section.effective_remote(),
            repo_name: section.repo_name.clone(),
            branch: section.branch.clone(),
            checkout_dir: root.join(&section.repo_name),
            roles_dir: provisioning_dir.join("roles"),
            log_dir: provisioning_dir.join(&section.log_dir),
            provisioning_dir,
            root,
            provision_playbook: section.provision_playbook.clone(),
            tests_playbook: section.tests_playbook.clone(),
            tests_message: section.tests_message.clone(),
            run_integration_tests: section.run_integration_tests,
            git: section.git.clone(),
            ansible_galaxy: section.ansible_galaxy.clone(),
            ansible_playbook: section.ansible_playbook.clone(),
        }
    }

    /// `<checkout>/roles`
    pub fn source_roles_dir(&self) -> PathBuf {
        self.checkout_dir.join("roles")
    }

    /// `<checkout>/vars/vaulted_vars`
    pub fn source_vars_file(&self) -> PathBuf {
        self.checkout_dir.join("vars").join("vaulted_vars")
    }

    /// `<checkout>/requirements.yml`
    pub fn source_requirements(&self) -> PathBuf {
        self.checkout_dir.join("requirements.yml")
    }

    pub fn dest_vars_file(&self) -> PathBuf {
        self.provisioning_dir.join("vars").join("vaulted_vars")
    }

    pub fn dest_requirements(&self) -> PathBuf {
        self.provisioning_dir.join("requirements.yml")
    }
}
