//! ImageShelf Core Domain Logic
//!
//! This crate contains:
//! - Cancellable background directory loading under generation tokens
//! - The display catalog and its generation fence
//! - The selection engine (click, toggle, range, rubber-band drag)
//! - File operations over the selection (copy, paste, delete, rename)
//! - The lazy directory tree
//! - The browser controller tying the pieces together
//! - Error types and the info/status seam

pub mod browser;
pub mod catalog;
pub mod decode;
pub mod error;
pub mod file_ops;
pub mod info;
pub mod loader;
pub mod selection;
pub mod tree;

pub use browser::{Browser, ClickModifiers, PumpOutcome, SlideshowRequest};
pub use catalog::{Applied, Catalog, LoadSummary};
pub use decode::{ImageDecoder, Raster, ThumbnailDecoder};
pub use error::AppError;
pub use file_ops::{FileOperationService, OpEvent, OpKind};
pub use info::{InfoSink, LogInfoSink, MemoryInfoSink};
pub use loader::{DirectoryLoader, LoaderEvent, ThumbnailItem, BATCH_SIZE, THUMBNAIL_EDGE};
pub use selection::{Point, Rect, SelectionEngine};
pub use tree::{DirectoryTree, NodeId, NodeState, TreeEvent, TreeNode};
