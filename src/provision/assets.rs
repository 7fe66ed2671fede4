// src/provision/assets.rs

//! Copying roles and vars out of the fresh clone.

use tracing::info;

use crate::config::ProvisionSettings;
use crate::errors::{CiwrapError, Result};
use crate::fs;

/// Copy every role directory, the vaulted vars file and the requirements
/// manifest from the clone into the provisioning tree.
///
/// Existing roles with the same name are replaced wholesale. Returns the
/// names of the copied roles.
pub fn copy_assets(settings: &ProvisionSettings) -> Result<Vec<String>> {
    let roles = copy_roles(settings)?;

    let vars_src = settings.source_vars_file();
    require_file(&vars_src)?;
    println!(
        "Copy vars files from {} from {}",
        vars_src.display(),
        settings.repo_name
    );
    fs::copy_file(&vars_src, &settings.dest_vars_file())?;

    let req_src = settings.source_requirements();
    require_file(&req_src)?;
    println!("Copy requirements file");
    fs::copy_file(&req_src, &settings.dest_requirements())?;

    Ok(roles)
}

fn copy_roles(settings: &ProvisionSettings) -> Result<Vec<String>> {
    let source = settings.source_roles_dir();
    if !source.is_dir() {
        return Err(CiwrapError::MissingPath(source));
    }

    let mut copied = Vec::new();
    for role_dir in fs::list_subdirs(&source)? {
        let Some(name) = role_dir.file_name() else {
            continue;
        };
        let name = name.to_string_lossy().into_owned();
        let dest = settings.roles_dir.join(&name);

        fs::remove_if_exists(&dest)?;
        println!("Copying role {name} from {}", settings.repo_name);
        fs::copy_dir_recursive(&role_dir, &dest)?;
        copied.push(name);
    }

    info!(count = copied.len(), roles = ?copied, "roles copied");
    Ok(copied)
}

fn require_file(path: &std::path::Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CiwrapError::MissingPath(path.to_path_buf()))
    }
}
