//! Directory listing and file entry snapshots

use crate::{FsError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Image extensions recognized by the scan and paste filters (lowercase).
/// This set is authoritative: the loader and the paste filter use it identically.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "bmp"];

/// Check whether a file name carries a recognized image extension
pub fn is_image_name(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((_, ext)) => IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()),
        None => false,
    }
}

/// Check whether a path carries a recognized image extension
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Kind of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileKind {
    Directory,
    Image,
    Other,
}

/// File entry with metadata, captured at scan time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: PathBuf,
    pub name: String,
    pub kind: FileKind,
    pub size: u64,
    pub modified: Option<i64>,
}

impl FileEntry {
    /// Create a new file entry from path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path)?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        let kind = if metadata.is_dir() {
            FileKind::Directory
        } else if is_image_path(path) {
            FileKind::Image
        } else {
            FileKind::Other
        };

        let modified = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
            .map(|d| d.as_secs() as i64);

        Ok(Self {
            path: path.to_path_buf(),
            name,
            kind,
            size: metadata.len(),
            modified,
        })
    }

    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }

    pub fn is_image(&self) -> bool {
        self.kind == FileKind::Image
    }
}

/// List all directory entries in enumeration order.
/// Entries whose metadata cannot be read are skipped.
pub fn list_directory<P: AsRef<Path>>(path: P) -> Result<Vec<FileEntry>> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(FsError::NotFound(path.display().to_string()));
    }

    if !path.is_dir() {
        return Err(FsError::InvalidPath(format!(
            "Not a directory: {}",
            path.display()
        )));
    }

    let mut entries = Vec::new();

    for entry in fs::read_dir(path)? {
        let entry = entry?;
        match FileEntry::from_path(entry.path()) {
            Ok(e) => entries.push(e),
            Err(_) => continue, // Skip entries we can't read
        }
    }

    Ok(entries)
}

/// List regular image files in a directory, in enumeration order
pub fn list_images<P: AsRef<Path>>(path: P) -> Result<Vec<FileEntry>> {
    Ok(list_directory(path)?
        .into_iter()
        .filter(|e| e.is_image())
        .collect())
}

/// List readable immediate subdirectories of a directory
pub fn list_subdirectories<P: AsRef<Path>>(path: P) -> Result<Vec<FileEntry>> {
    Ok(list_directory(path)?
        .into_iter()
        .filter(|e| e.is_dir() && fs::read_dir(&e.path).is_ok())
        .collect())
}

/// List volume roots: drive letters on Windows, "/" elsewhere.
/// An empty result means the filesystem could not be enumerated at all.
#[cfg(windows)]
pub fn volume_roots() -> Result<Vec<PathBuf>> {
    let mut drives = Vec::new();

    for letter in b'A'..=b'Z' {
        let drive = format!("{}:\\", letter as char);
        let path = PathBuf::from(&drive);
        if path.exists() {
            drives.push(path);
        }
    }

    if drives.is_empty() {
        return Err(FsError::NotFound("no volume roots".into()));
    }

    Ok(drives)
}

#[cfg(not(windows))]
pub fn volume_roots() -> Result<Vec<PathBuf>> {
    let root = PathBuf::from("/");
    if !root.exists() {
        return Err(FsError::NotFound("no volume roots".into()));
    }
    Ok(vec![root])
}
