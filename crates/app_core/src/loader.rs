//! Cancellable background directory loading
//!
//! One logical "current load" exists per loader: every `load` call bumps
//! the shared generation counter, which supersedes any running scan. A
//! superseded worker finishes its current file and then stops publishing;
//! the consumer additionally drops any batch whose generation is stale.

use crate::decode::ThumbnailDecoder;
use crate::Raster;
use app_fs::FileEntry;
use crossbeam_channel::{Receiver, Sender};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Longest thumbnail edge, in pixels
pub const THUMBNAIL_EDGE: u32 = 150;

/// Number of decoded thumbnails published per batch
pub const BATCH_SIZE: usize = 8;

/// A decoded thumbnail, valid only while its generation is current
#[derive(Debug, Clone)]
pub struct ThumbnailItem {
    pub entry: FileEntry,
    pub raster: Raster,
    pub generation: u64,
}

/// Events published by loader workers, in order
#[derive(Debug, Clone)]
pub enum LoaderEvent {
    /// A batch of decoded thumbnails in directory-enumeration order
    Batch {
        generation: u64,
        items: Vec<ThumbnailItem>,
    },
    /// The scan ran to completion without being superseded
    Completed {
        generation: u64,
        directory: PathBuf,
        count: usize,
        total_bytes: u64,
    },
}

/// Background directory scanner and thumbnail decoder
pub struct DirectoryLoader {
    generation: Arc<AtomicU64>,
    decoder: Arc<dyn ThumbnailDecoder>,
    events_tx: Sender<LoaderEvent>,
}

impl DirectoryLoader {
    /// Create a loader and the event channel its workers publish on
    pub fn new(decoder: Arc<dyn ThumbnailDecoder>) -> (Self, Receiver<LoaderEvent>) {
        let (events_tx, events_rx) = crossbeam_channel::unbounded();
        (
            Self {
                generation: Arc::new(AtomicU64::new(0)),
                decoder,
                events_tx,
            },
            events_rx,
        )
    }

    /// Generation of the most recently requested load
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Start loading a directory, superseding any running scan.
    /// Returns the new generation.
    pub fn load(&self, directory: &Path) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!("Loading directory (gen {}): {}", generation, directory.display());

        let worker = LoadWorker {
            generation,
            current: Arc::clone(&self.generation),
            decoder: Arc::clone(&self.decoder),
            events_tx: self.events_tx.clone(),
            directory: directory.to_path_buf(),
        };

        std::thread::spawn(move || worker.run());

        generation
    }
}

struct LoadWorker {
    generation: u64,
    current: Arc<AtomicU64>,
    decoder: Arc<dyn ThumbnailDecoder>,
    events_tx: Sender<LoaderEvent>,
    directory: PathBuf,
}

impl LoadWorker {
    fn superseded(&self) -> bool {
        self.current.load(Ordering::SeqCst) != self.generation
    }

    fn run(self) {
        // An unreadable or non-directory target yields an empty result
        // set; only a diagnostic is surfaced.
        let entries = match app_fs::list_images(&self.directory) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Cannot scan {}: {}", self.directory.display(), e);
                Vec::new()
            }
        };

        let mut batch = Vec::with_capacity(BATCH_SIZE);
        let mut count = 0usize;
        let mut total_bytes = 0u64;

        for entry in entries {
            // Cooperative cancellation: checked between files, never mid-decode
            if self.superseded() {
                tracing::debug!(
                    "Load gen {} superseded, stopping after {} items",
                    self.generation,
                    count
                );
                return;
            }

            let bytes = match std::fs::read(&entry.path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::debug!("Skipping unreadable {}: {}", entry.path.display(), e);
                    continue;
                }
            };

            match self.decoder.decode(&bytes, THUMBNAIL_EDGE) {
                Ok(raster) => {
                    count += 1;
                    total_bytes += entry.size;
                    batch.push(ThumbnailItem {
                        entry,
                        raster,
                        generation: self.generation,
                    });

                    if batch.len() >= BATCH_SIZE {
                        self.publish_batch(&mut batch);
                    }
                }
                Err(e) => {
                    // Decode failure never aborts the scan
                    tracing::debug!("Skipping undecodable {}: {}", entry.path.display(), e);
                }
            }
        }

        if !batch.is_empty() {
            self.publish_batch(&mut batch);
        }

        if !self.superseded() {
            let _ = self.events_tx.send(LoaderEvent::Completed {
                generation: self.generation,
                directory: self.directory.clone(),
                count,
                total_bytes,
            });
        }
    }

    fn publish_batch(&self, batch: &mut Vec<ThumbnailItem>) {
        let items = std::mem::take(batch);
        let _ = self.events_tx.send(LoaderEvent::Batch {
            generation: self.generation,
            items,
        });
    }
}
