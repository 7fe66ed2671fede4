// src/config/model.rs

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [gotest]
/// module = "mistify-agent"
/// timeout = "30s"
///
/// [provision]
/// repo_name = "infrastructure-jenkins-slave"
/// branch = "master"
/// ```
///
/// Every section and key is optional; an empty file is a valid config.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub gotest: GoTestSection,

    #[serde(default)]
    pub provision: ProvisionSection,
}

/// A validated configuration. Only obtainable through
/// `ConfigFile::try_from(RawConfigFile)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub gotest: GoTestSection,
    pub provision: ProvisionSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(gotest: GoTestSection, provision: ProvisionSection) -> Self {
        Self { gotest, provision }
    }
}

/// `[gotest]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GoTestSection {
    /// Repository/module under `package_root` whose tests are run.
    #[serde(default)]
    pub module: Option<String>,

    /// Import path prefix, e.g. `github.com/mistifyio`.
    #[serde(default = "default_package_root")]
    pub package_root: String,

    /// Explicit go binary; skips the `which go` lookup when set.
    #[serde(default)]
    pub go_binary: Option<String>,

    /// Used when `which go` finds nothing.
    #[serde(default = "default_fallback_go_binary")]
    pub fallback_go_binary: String,

    /// Report converter; defaults to `$GOPATH/bin/go-junit-report`.
    #[serde(default)]
    pub junit_binary: Option<String>,

    /// Run `go test` through `sudo -E`.
    #[serde(default = "default_true")]
    pub sudo: bool,

    /// Value for `go test -timeout`.
    #[serde(default = "default_timeout")]
    pub timeout: String,

    /// Value for `go test -p`.
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_package_root() -> String {
    "github.com/mistifyio".to_string()
}

fn default_fallback_go_binary() -> String {
    "/usr/local/go/bin/go".to_string()
}

fn default_timeout() -> String {
    "30s".to_string()
}

fn default_parallelism() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl Default for GoTestSection {
    fn default() -> Self {
        Self {
            module: None,
            package_root: default_package_root(),
            go_binary: None,
            fallback_go_binary: default_fallback_go_binary(),
            junit_binary: None,
            sudo: true,
            timeout: default_timeout(),
            parallelism: default_parallelism(),
        }
    }
}

/// `[provision]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProvisionSection {
    /// Name of the infrastructure repository; also the local clone directory.
    #[serde(default = "default_repo_name")]
    pub repo_name: String,

    /// Remote prefix; the clone URL is `remote_base + repo_name`.
    #[serde(default = "default_remote_base")]
    pub remote_base: String,

    /// Full clone URL, overriding `remote_base + repo_name`.
    #[serde(default)]
    pub remote: Option<String>,

    #[serde(default = "default_branch")]
    pub branch: String,

    /// Provisioning tree, relative to the root directory.
    #[serde(default = "default_provisioning_dir")]
    pub provisioning_dir: String,

    #[serde(default = "default_provision_playbook")]
    pub provision_playbook: String,

    #[serde(default = "default_tests_playbook")]
    pub tests_playbook: String,

    /// Printed before `tests_playbook` runs.
    #[serde(default = "default_tests_message")]
    pub tests_message: String,

    /// Run `tests_playbook` after a successful provisioning run.
    #[serde(default = "default_true")]
    pub run_integration_tests: bool,

    /// Step logs, relative to the provisioning directory.
    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_git")]
    pub git: String,

    #[serde(default = "default_ansible_galaxy")]
    pub ansible_galaxy: String,

    #[serde(default = "default_ansible_playbook")]
    pub ansible_playbook: String,
}

fn default_repo_name() -> String {
    "infrastructure-jenkins-slave".to_string()
}

fn default_remote_base() -> String {
    "git@github.com:mistifyio/".to_string()
}

fn default_branch() -> String {
    "master".to_string()
}

fn default_provisioning_dir() -> String {
    "provisioning".to_string()
}

fn default_provision_playbook() -> String {
    "provision-container.yml".to_string()
}

fn default_tests_playbook() -> String {
    "execute-tests.yml".to_string()
}

fn default_tests_message() -> String {
    "Executing go kvm tests".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_git() -> String {
    "git".to_string()
}

fn default_ansible_galaxy() -> String {
    "ansible-galaxy".to_string()
}

fn default_ansible_playbook() -> String {
    "ansible-playbook".to_string()
}

impl Default for ProvisionSection {
    fn default() -> Self {
        Self {
            repo_name: default_repo_name(),
            remote_base: default_remote_base(),
            remote: None,
            branch: default_branch(),
            provisioning_dir: default_provisioning_dir(),
            provision_playbook: default_provision_playbook(),
            tests_playbook: default_tests_playbook(),
            tests_message: default_tests_message(),
            run_integration_tests: true,
            log_dir: default_log_dir(),
            git: default_git(),
            ansible_galaxy: default_ansible_galaxy(),
            ansible_playbook: default_ansible_playbook(),
        }
    }
}

impl ProvisionSection {
    /// Clone URL: explicit `remote`, else `remote_base + repo_name`.
    pub fn effective_remote(&self) -> String {
        self.remote
            .clone()
            .unwrap_or_else(|| format!("{}{}", self.remote_base, self.repo_name))
    }
}
