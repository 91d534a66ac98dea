//! Display catalog: the ordered set of currently shown thumbnails
//!
//! The catalog is the sole consumer of loader events. It applies a batch
//! only when the batch's generation matches the generation it was last
//! reset to; anything else is dropped silently.

use crate::loader::{LoaderEvent, ThumbnailItem};
use std::path::{Path, PathBuf};

/// Summary of a completed load, for the info line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub directory: PathBuf,
    pub count: usize,
    pub total_bytes: u64,
}

impl LoadSummary {
    /// "Directory: holiday | 42 images | 12.34 MB"
    pub fn info_line(&self) -> String {
        let name = self
            .directory
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.directory.display().to_string());
        format!(
            "Directory: {} | {} images | {:.2} MB",
            name,
            self.count,
            self.total_bytes as f64 / (1024.0 * 1024.0)
        )
    }
}

/// Outcome of applying one loader event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// Items were appended to the display
    Appended(usize),
    /// The current load ran to completion
    Completed(LoadSummary),
    /// The event belonged to a superseded generation and was dropped
    Stale,
}

/// Ordered display list under a generation fence
#[derive(Default)]
pub struct Catalog {
    items: Vec<ThumbnailItem>,
    generation: u64,
    directory: Option<PathBuf>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a new load: clears the display and moves the fence
    pub fn begin_load(&mut self, directory: &Path, generation: u64) {
        self.items.clear();
        self.generation = generation;
        self.directory = Some(directory.to_path_buf());
    }

    /// Apply one loader event, enforcing the generation fence
    pub fn apply(&mut self, event: LoaderEvent) -> Applied {
        match event {
            LoaderEvent::Batch { generation, items } => {
                if generation != self.generation {
                    tracing::debug!("Dropping stale batch (gen {})", generation);
                    return Applied::Stale;
                }
                let appended = items.len();
                self.items.extend(items);
                Applied::Appended(appended)
            }
            LoaderEvent::Completed {
                generation,
                directory,
                count,
                total_bytes,
            } => {
                if generation != self.generation {
                    tracing::debug!("Dropping stale completion (gen {})", generation);
                    return Applied::Stale;
                }
                Applied::Completed(LoadSummary {
                    directory,
                    count,
                    total_bytes,
                })
            }
        }
    }

    pub fn items(&self) -> &[ThumbnailItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Directory the display currently belongs to
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Ordered display keys (file paths)
    pub fn paths(&self) -> Vec<PathBuf> {
        self.items.iter().map(|i| i.entry.path.clone()).collect()
    }

    /// Resolve a display key to its index
    pub fn index_of(&self, path: &Path) -> Option<usize> {
        self.items.iter().position(|i| i.entry.path == path)
    }

    /// Ordered image list plus start index for the slideshow viewer
    pub fn slideshow_from(&self, start: &Path) -> Option<(Vec<PathBuf>, usize)> {
        let index = self.index_of(start)?;
        Some((self.paths(), index))
    }
}
