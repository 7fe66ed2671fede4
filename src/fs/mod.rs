// src/fs/mod.rs

//! Filesystem helpers for the provisioning tree.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

/// Remove `path` and everything below it, if it exists.
///
/// Returns whether anything was removed.
pub fn remove_if_exists(path: &Path) -> Result<bool> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e).with_context(|| format!("inspecting {:?}", path)),
    };

    if meta.is_dir() {
        fs::remove_dir_all(path).with_context(|| format!("removing dir {:?}", path))?;
    } else {
        fs::remove_file(path).with_context(|| format!("removing file {:?}", path))?;
    }
    debug!(?path, "removed");
    Ok(true)
}

/// Sorted list of the directories directly inside `dir`.
pub fn list_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading dir {:?}", dir))? {
        let entry = entry.with_context(|| format!("reading entry of {:?}", dir))?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Copy `src` to `dst` recursively. `dst` must not exist yet.
///
/// Symlinks are recreated as symlinks on Unix and followed elsewhere.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst).with_context(|| format!("creating dir {:?}", dst))?;

    for entry in fs::read_dir(src).with_context(|| format!("reading dir {:?}", src))? {
        let entry = entry.with_context(|| format!("reading entry of {:?}", src))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            copy_dir_recursive(&from, &to)?;
        } else if file_type.is_symlink() {
            copy_symlink(&from, &to)?;
        } else {
            fs::copy(&from, &to).with_context(|| format!("copying {:?} to {:?}", from, to))?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> Result<()> {
    let target = fs::read_link(from).with_context(|| format!("reading link {:?}", from))?;
    std::os::unix::fs::symlink(&target, to)
        .with_context(|| format!("creating link {:?} -> {:?}", to, target))
}

#[cfg(not(unix))]
fn copy_symlink(from: &Path, to: &Path) -> Result<()> {
    if from.is_dir() {
        copy_dir_recursive(from, to)
    } else {
        fs::copy(from, to).with_context(|| format!("copying {:?} to {:?}", from, to))?;
        Ok(())
    }
}

/// Copy a single file, creating the destination's parent directories.
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating dir {:?}", parent))?;
    }
    fs::copy(src, dst).with_context(|| format!("copying {:?} to {:?}", src, dst))?;
    Ok(())
}

/// Write `contents` to `path`, creating parent directories.
pub fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating dir {:?}", parent))?;
    }
    fs::write(path, contents).with_context(|| format!("writing to file {:?}", path))
}
