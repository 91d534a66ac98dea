//! Transfer buffer capability backing copy/paste
//!
//! Copy stages a list of file paths; paste reads back whatever list is
//! currently staged. The core treats an in-process buffer and the system
//! clipboard interchangeably.

use crate::Result;
use parking_lot::Mutex;
use std::path::PathBuf;

/// Staging area for file paths between copy and paste
pub trait TransferBuffer: Send + Sync {
    /// Stage a list of absolute file paths
    fn stage(&self, paths: &[PathBuf]) -> Result<()>;

    /// Read back the currently staged paths
    fn staged(&self) -> Result<Vec<PathBuf>>;
}

/// In-process transfer buffer
#[derive(Default)]
pub struct InProcessBuffer {
    paths: Mutex<Vec<PathBuf>>,
}

impl InProcessBuffer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransferBuffer for InProcessBuffer {
    fn stage(&self, paths: &[PathBuf]) -> Result<()> {
        *self.paths.lock() = paths.to_vec();
        Ok(())
    }

    fn staged(&self) -> Result<Vec<PathBuf>> {
        Ok(self.paths.lock().clone())
    }
}

/// System clipboard transfer buffer.
/// Paths are encoded as newline-separated `file://` text lines.
#[cfg(feature = "clipboard")]
pub struct SystemClipboard {
    clipboard: Mutex<Option<arboard::Clipboard>>,
}

#[cfg(feature = "clipboard")]
impl SystemClipboard {
    pub fn new() -> Self {
        Self {
            clipboard: Mutex::new(arboard::Clipboard::new().ok()),
        }
    }
}

#[cfg(feature = "clipboard")]
impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "clipboard")]
impl TransferBuffer for SystemClipboard {
    fn stage(&self, paths: &[PathBuf]) -> Result<()> {
        let text = paths
            .iter()
            .map(|p| format!("file://{}", p.display()))
            .collect::<Vec<_>>()
            .join("\n");

        match self.clipboard.lock().as_mut() {
            Some(clipboard) => clipboard
                .set_text(&text)
                .map_err(|e| crate::FsError::Clipboard(e.to_string()))?,
            None => return Err(crate::FsError::Clipboard("Clipboard not available".into())),
        }

        tracing::debug!("Staged {} paths on the system clipboard", paths.len());
        Ok(())
    }

    fn staged(&self) -> Result<Vec<PathBuf>> {
        let text = match self.clipboard.lock().as_mut() {
            Some(clipboard) => clipboard
                .get_text()
                .map_err(|e| crate::FsError::Clipboard(e.to_string()))?,
            None => return Err(crate::FsError::Clipboard("Clipboard not available".into())),
        };

        let paths = text
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| PathBuf::from(line.strip_prefix("file://").unwrap_or(line)))
            .collect();

        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_process_buffer_round_trip() {
        let buffer = InProcessBuffer::new();
        let paths = vec![PathBuf::from("/pics/a.png"), PathBuf::from("/pics/b.jpg")];

        buffer.stage(&paths).unwrap();
        assert_eq!(buffer.staged().unwrap(), paths);
    }

    #[test]
    fn restaging_replaces_previous_contents() {
        let buffer = InProcessBuffer::new();
        buffer.stage(&[PathBuf::from("/pics/a.png")]).unwrap();
        buffer.stage(&[PathBuf::from("/pics/b.jpg")]).unwrap();

        assert_eq!(buffer.staged().unwrap(), vec![PathBuf::from("/pics/b.jpg")]);
    }
}
