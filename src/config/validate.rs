// src/config/validate.rs

use crate::config::model::{ConfigFile, GoTestSection, ProvisionSection, RawConfigFile};
use crate::errors::{CiwrapError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = CiwrapError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_gotest(&raw.gotest)?;
        validate_provision(&raw.provision)?;
        Ok(ConfigFile::new_unchecked(raw.gotest, raw.provision))
    }
}

fn validate_gotest(section: &GoTestSection) -> Result<()> {
    if let Some(module) = &section.module {
        ensure_non_empty("[gotest].module", module)?;
    }
    ensure_non_empty("[gotest].package_root", &section.package_root)?;
    ensure_non_empty("[gotest].fallback_go_binary", &section.fallback_go_binary)?;
    ensure_non_empty("[gotest].timeout", &section.timeout)?;

    if section.parallelism == 0 {
        return Err(CiwrapError::ConfigError(
            "[gotest].parallelism must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}

fn validate_provision(section: &ProvisionSection) -> Result<()> {
    ensure_non_empty("[provision].repo_name", &section.repo_name)?;
    ensure_non_empty("[provision].branch", &section.branch)?;
    ensure_non_empty("[provision].provisioning_dir", &section.provisioning_dir)?;
    ensure_non_empty("[provision].provision_playbook", &section.provision_playbook)?;
    ensure_non_empty("[provision].tests_playbook", &section.tests_playbook)?;
    ensure_non_empty("[provision].log_dir", &section.log_dir)?;

    // The repo name doubles as the clone directory, which gets deleted
    // before every clone.
    if section.repo_name.contains('/') || section.repo_name == "." || section.repo_name == ".." {
        return Err(CiwrapError::ConfigError(format!(
            "[provision].repo_name must be a plain directory name (got '{}')",
            section.repo_name
        )));
    }

    Ok(())
}

fn ensure_non_empty(key: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CiwrapError::ConfigError(format!("{key} must not be empty")));
    }
    Ok(())
}
