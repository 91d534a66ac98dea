//! File operation primitives shared by paste, delete and rename

use crate::{FsError, Result};
use std::path::{Path, PathBuf};

/// Split a file name into stem and extension (the extension excludes the dot).
/// A leading dot is part of the stem, matching `Path::extension` semantics.
fn split_name(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => {
            (&name[..idx], Some(&name[idx + 1..]))
        }
        _ => (name, None),
    }
}

/// Resolve a collision-free destination path for `name` inside `dir`.
///
/// If `dir/name` does not exist it is returned as-is; otherwise
/// `base (1).ext`, `base (2).ext`, ... are probed until a free path is
/// found. Deterministic given the directory contents at call time, and
/// never returns an existing path.
pub fn unique_name(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let (base, ext) = split_name(name);
    let mut counter = 1u32;

    loop {
        let next = match ext {
            Some(ext) => format!("{} ({}).{}", base, counter, ext),
            None => format!("{} ({})", base, counter),
        };
        let candidate = dir.join(next);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Byte-for-byte copy of a regular file. Never overwrites.
pub fn copy_file(src: &Path, dest: &Path) -> Result<u64> {
    if !src.exists() {
        return Err(FsError::NotFound(src.display().to_string()));
    }

    if dest.exists() {
        return Err(FsError::AlreadyExists(dest.display().to_string()));
    }

    let bytes = std::fs::copy(src, dest)?;
    tracing::debug!("Copied: {} -> {}", src.display(), dest.display());
    Ok(bytes)
}

/// Remove a single file from the filesystem
pub fn delete_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(FsError::NotFound(path.display().to_string()));
    }

    std::fs::remove_file(path)?;
    tracing::info!("Deleted: {}", path.display());
    Ok(())
}

/// Rename a file. The destination must not exist.
pub fn rename_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(FsError::NotFound(from.display().to_string()));
    }

    if to.exists() {
        return Err(FsError::AlreadyExists(to.display().to_string()));
    }

    std::fs::rename(from, to)?;
    tracing::info!("Renamed: {} -> {}", from.display(), to.display());
    Ok(())
}
