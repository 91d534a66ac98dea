//! ImageShelf File System Layer
//!
//! Provides the filesystem capabilities the browser core builds on:
//! - FileEntry: immutable snapshots of directory entries
//! - Directory listing filtered to recognized image types
//! - Volume root enumeration for the folder tree
//! - File operation primitives (copy, delete, rename) and
//!   collision-free destination naming
//! - TransferBuffer: the copy/paste staging capability

mod browser;
mod ops;
mod transfer;

pub use browser::{
    is_image_name, is_image_path, list_directory, list_images, list_subdirectories,
    volume_roots, FileEntry, FileKind, IMAGE_EXTENSIONS,
};
pub use ops::{copy_file, delete_file, rename_file, unique_name};
pub use transfer::{InProcessBuffer, TransferBuffer};

#[cfg(feature = "clipboard")]
pub use transfer::SystemClipboard;

use thiserror::Error;

/// File system errors
#[derive(Error, Debug)]
pub enum FsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Path already exists: {0}")]
    AlreadyExists(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

pub type Result<T> = std::result::Result<T, FsError>;
