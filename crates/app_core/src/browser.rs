//! Browser controller: the command/event seam for a presentation shell
//!
//! The controller runs on the single control thread. It translates raw
//! input into typed operations on the loader, selection engine, file
//! operation service and directory tree, and `pump` applies whatever the
//! background workers have published since the last call. The control
//! thread never blocks on filesystem or decode work.

use crate::catalog::{Applied, Catalog};
use crate::decode::ThumbnailDecoder;
use crate::file_ops::{FileOperationService, OpEvent};
use crate::info::InfoSink;
use crate::loader::{DirectoryLoader, LoaderEvent};
use crate::selection::{Rect, SelectionEngine};
use crate::tree::{DirectoryTree, NodeId, TreeEvent};
use crate::AppError;
use app_fs::TransferBuffer;
use crossbeam_channel::Receiver;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Modifier state of a click gesture
#[derive(Debug, Clone, Copy, Default)]
pub struct ClickModifiers {
    /// Secondary modifier: toggle membership
    pub toggle: bool,
    /// Range modifier: contiguous run from the anchor
    pub range: bool,
}

/// Call contract for the slideshow viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideshowRequest {
    pub images: Vec<PathBuf>,
    pub start_index: usize,
}

/// What a `pump` call changed
#[derive(Debug, Clone, Copy, Default)]
pub struct PumpOutcome {
    pub display_changed: bool,
    pub tree_changed: bool,
    /// A load for the still-current generation ran to completion
    pub load_completed: bool,
}

/// Top-level browsing context
pub struct Browser {
    loader: DirectoryLoader,
    loader_rx: Receiver<LoaderEvent>,
    catalog: Catalog,
    selection: SelectionEngine,
    ops: FileOperationService,
    ops_rx: Receiver<OpEvent>,
    tree: DirectoryTree,
    tree_rx: Receiver<TreeEvent>,
    info: Arc<dyn InfoSink>,
    op_in_flight: bool,
}

impl Browser {
    /// Build a browser over the filesystem's volume roots.
    /// Fails only when the roots cannot be enumerated.
    pub fn new(
        decoder: Arc<dyn ThumbnailDecoder>,
        transfer: Arc<dyn TransferBuffer>,
        info: Arc<dyn InfoSink>,
    ) -> Result<Self, AppError> {
        let (tree, tree_rx) = DirectoryTree::new()?;
        Ok(Self::assemble(decoder, transfer, info, tree, tree_rx))
    }

    /// Build a browser over explicit tree roots
    pub fn with_tree_roots(
        decoder: Arc<dyn ThumbnailDecoder>,
        transfer: Arc<dyn TransferBuffer>,
        info: Arc<dyn InfoSink>,
        roots: Vec<PathBuf>,
    ) -> Self {
        let (tree, tree_rx) = DirectoryTree::with_roots(roots);
        Self::assemble(decoder, transfer, info, tree, tree_rx)
    }

    fn assemble(
        decoder: Arc<dyn ThumbnailDecoder>,
        transfer: Arc<dyn TransferBuffer>,
        info: Arc<dyn InfoSink>,
        tree: DirectoryTree,
        tree_rx: Receiver<TreeEvent>,
    ) -> Self {
        let (loader, loader_rx) = DirectoryLoader::new(decoder);
        let (ops, ops_rx) = FileOperationService::new(transfer, Arc::clone(&info));

        Self {
            loader,
            loader_rx,
            catalog: Catalog::new(),
            selection: SelectionEngine::new(Arc::clone(&info)),
            ops,
            ops_rx,
            tree,
            tree_rx,
            info,
            op_in_flight: false,
        }
    }

    // ----- directory navigation -----

    /// Switch the browsing context to a directory: supersedes any running
    /// load, clears the display and the selection.
    pub fn open_directory(&mut self, path: &Path) {
        let generation = self.loader.load(path);
        self.catalog.begin_load(path, generation);
        self.selection.clear();
    }

    /// Open the directory a tree node stands for
    pub fn open_tree_node(&mut self, id: NodeId) {
        if let Some(path) = self.tree.node(id).path.clone() {
            self.open_directory(&path);
        }
    }

    /// Request lazy expansion of a tree node
    pub fn expand_tree_node(&mut self, id: NodeId) -> bool {
        self.tree.request_expand(id)
    }

    pub fn tree(&self) -> &DirectoryTree {
        &self.tree
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn current_directory(&self) -> Option<&Path> {
        self.catalog.directory()
    }

    // ----- selection gestures -----

    pub fn click(&mut self, target: &Path, modifiers: ClickModifiers) {
        let display = self.catalog.paths();
        if modifiers.range {
            self.selection.range(&display, target);
        } else if modifiers.toggle {
            self.selection.toggle(&display, target);
        } else {
            self.selection.click(&display, target);
        }
    }

    /// Click on empty panel space deselects everything
    pub fn background_click(&mut self) {
        self.selection.clear();
    }

    /// One rubber-band drag step over the given item bounds
    pub fn drag(&mut self, region: Rect, bounds: &[(PathBuf, Rect)]) {
        self.selection.drag(bounds, &region);
    }

    /// Right-click on an item pulls it into the selection before the menu
    pub fn context_click(&mut self, target: &Path) {
        let display = self.catalog.paths();
        self.selection.ensure_selected(&display, target);
    }

    pub fn selected_paths(&self) -> &[PathBuf] {
        self.selection.selected()
    }

    pub fn selection_count(&self) -> usize {
        self.selection.count()
    }

    // ----- slideshow -----

    /// Double-click opens the slideshow at the clicked image
    pub fn double_click(&self, target: &Path) -> Option<SlideshowRequest> {
        self.catalog
            .slideshow_from(target)
            .map(|(images, start_index)| SlideshowRequest { images, start_index })
    }

    /// Play the whole directory from the first image
    pub fn slideshow_all(&self) -> Option<SlideshowRequest> {
        if self.catalog.is_empty() {
            return None;
        }
        Some(SlideshowRequest {
            images: self.catalog.paths(),
            start_index: 0,
        })
    }

    // ----- file operations -----

    /// Menu preconditions
    pub fn can_copy(&self) -> bool {
        !self.selection.is_empty()
    }

    pub fn can_rename(&self) -> bool {
        self.selection.count() == 1
    }

    pub fn operation_pending(&self) -> bool {
        self.op_in_flight
    }

    pub fn copy(&self) -> Result<(), AppError> {
        self.ops.copy(self.selection.selected())
    }

    pub fn paste(&mut self) -> Result<(), AppError> {
        self.admit_operation()?;
        let Some(target) = self.catalog.directory().map(Path::to_path_buf) else {
            return Err(AppError::FileNotFound("no directory open".into()));
        };
        self.op_in_flight = true;
        self.ops.paste(&target);
        Ok(())
    }

    pub fn delete(&mut self) -> Result<(), AppError> {
        self.admit_operation()?;
        if self.selection.is_empty() {
            return Ok(());
        }
        let Some(dir) = self.catalog.directory().map(Path::to_path_buf) else {
            return Err(AppError::FileNotFound("no directory open".into()));
        };
        self.op_in_flight = true;
        self.ops.delete(self.selection.selected().to_vec(), dir);
        Ok(())
    }

    pub fn rename(&mut self, new_name: &str) -> Result<(), AppError> {
        self.admit_operation()?;
        self.ops.rename(self.selection.selected(), new_name)?;
        self.op_in_flight = true;
        Ok(())
    }

    fn admit_operation(&self) -> Result<(), AppError> {
        if self.op_in_flight {
            return Err(AppError::OperationInFlight);
        }
        Ok(())
    }

    // ----- event pump -----

    /// Drain pending worker events and apply them. Called from the
    /// control thread; never blocks.
    pub fn pump(&mut self) -> PumpOutcome {
        let mut outcome = PumpOutcome::default();

        while let Ok(event) = self.loader_rx.try_recv() {
            match self.catalog.apply(event) {
                Applied::Appended(_) => outcome.display_changed = true,
                Applied::Completed(summary) => {
                    self.info.update(&summary.info_line());
                    outcome.load_completed = true;
                }
                Applied::Stale => {}
            }
        }

        while let Ok(event) = self.ops_rx.try_recv() {
            self.op_in_flight = false;
            if let Some(dir) = event.reload {
                self.open_directory(&dir);
                outcome.display_changed = true;
            }
        }

        while let Ok(event) = self.tree_rx.try_recv() {
            if self.tree.apply(event).is_some() {
                outcome.tree_changed = true;
            }
        }

        outcome
    }
}
