//! File operations over the current selection
//!
//! Copy stages paths into the transfer buffer without touching the
//! filesystem. Paste, delete and rename run on background workers and
//! post a completion event; the controller reloads the affected
//! directory when the event is processed. Per-item failures are isolated
//! and reported in aggregate; no single failure unwinds a batch.

use crate::info::InfoSink;
use crate::AppError;
use app_fs::TransferBuffer;
use crossbeam_channel::{Receiver, Sender};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Characters rejected in a rename target, besides path separators
const RESERVED_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Kind of a background file operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Paste,
    Delete,
    Rename,
}

/// Completion of a background file operation
#[derive(Debug, Clone)]
pub struct OpEvent {
    pub kind: OpKind,
    pub failed: usize,
    pub total: usize,
    /// Directory to reload once the completion is processed
    pub reload: Option<PathBuf>,
}

/// Copy/paste/delete/rename acting on the current selection
pub struct FileOperationService {
    transfer: Arc<dyn TransferBuffer>,
    info: Arc<dyn InfoSink>,
    events_tx: Sender<OpEvent>,
}

impl FileOperationService {
    /// Create the service and the channel its workers complete on
    pub fn new(
        transfer: Arc<dyn TransferBuffer>,
        info: Arc<dyn InfoSink>,
    ) -> (Self, Receiver<OpEvent>) {
        let (events_tx, events_rx) = crossbeam_channel::unbounded();
        (
            Self {
                transfer,
                info,
                events_tx,
            },
            events_rx,
        )
    }

    /// Stage the selected paths for a later paste. No filesystem I/O.
    pub fn copy(&self, selection: &[PathBuf]) -> Result<(), AppError> {
        if selection.is_empty() {
            return Ok(());
        }
        self.transfer.stage(selection)?;
        self.info.update(&format!("Copied {} files", selection.len()));
        Ok(())
    }

    /// Paste staged files into `target_dir` as a single background unit.
    /// Only regular files with recognized image extensions are pasted;
    /// collisions are resolved, nothing is ever overwritten. A reload of
    /// the target is requested regardless of partial failure.
    pub fn paste(&self, target_dir: &Path) {
        let transfer = Arc::clone(&self.transfer);
        let info = Arc::clone(&self.info);
        let events_tx = self.events_tx.clone();
        let target = target_dir.to_path_buf();

        std::thread::spawn(move || {
            let staged = match transfer.staged() {
                Ok(paths) => paths,
                Err(e) => {
                    tracing::warn!("Paste: cannot read transfer buffer: {}", e);
                    Vec::new()
                }
            };

            let sources: Vec<_> = staged
                .into_iter()
                .filter(|p| p.is_file() && app_fs::is_image_path(p))
                .collect();

            let total = sources.len();
            let mut failed = 0usize;

            for source in &sources {
                let Some(name) = source.file_name().and_then(|n| n.to_str()) else {
                    failed += 1;
                    continue;
                };
                let dest = app_fs::unique_name(&target, name);
                if let Err(e) = app_fs::copy_file(source, &dest) {
                    tracing::warn!("Paste failed for {}: {}", source.display(), e);
                    failed += 1;
                }
            }

            info.update(&op_summary("Paste", failed, total));
            let _ = events_tx.send(OpEvent {
                kind: OpKind::Paste,
                failed,
                total,
                reload: Some(target),
            });
        });
    }

    /// Delete the selected files. Each removal is attempted independently;
    /// a reload of `reload_dir` is requested even if every removal failed.
    pub fn delete(&self, selection: Vec<PathBuf>, reload_dir: PathBuf) {
        let info = Arc::clone(&self.info);
        let events_tx = self.events_tx.clone();

        std::thread::spawn(move || {
            let total = selection.len();
            let mut failed = 0usize;

            for path in &selection {
                if let Err(e) = app_fs::delete_file(path) {
                    tracing::warn!("Delete failed for {}: {}", path.display(), e);
                    failed += 1;
                }
            }

            info.update(&op_summary("Delete", failed, total));
            let _ = events_tx.send(OpEvent {
                kind: OpKind::Delete,
                failed,
                total,
                reload: Some(reload_dir),
            });
        });
    }

    /// Rename the single selected file to `new_name`.
    ///
    /// Validation happens before any filesystem call: the selection must
    /// be exactly one item, the name must be non-empty, differ from the
    /// current one and contain no separator or reserved character. A
    /// missing extension is filled in from the source file, and the final
    /// name goes through collision resolution like paste does.
    pub fn rename(&self, selection: &[PathBuf], new_name: &str) -> Result<(), AppError> {
        if selection.len() != 1 {
            return Err(AppError::InvalidName(
                "rename requires exactly one selected item".into(),
            ));
        }
        let source = selection[0].clone();
        let current_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AppError::InvalidName("source has no file name".into()))?;

        let new_name = validate_new_name(new_name, current_name)?;
        let new_name = with_source_extension(&new_name, current_name);

        let info = Arc::clone(&self.info);
        let events_tx = self.events_tx.clone();

        std::thread::spawn(move || {
            let parent = source
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            let dest = app_fs::unique_name(&parent, &new_name);

            match app_fs::rename_file(&source, &dest) {
                Ok(()) => {
                    info.update(&format!(
                        "Renamed to {}",
                        dest.file_name().unwrap_or_default().to_string_lossy()
                    ));
                    let _ = events_tx.send(OpEvent {
                        kind: OpKind::Rename,
                        failed: 0,
                        total: 1,
                        reload: Some(parent),
                    });
                }
                Err(e) => {
                    // Source is left untouched
                    tracing::warn!("Rename failed for {}: {}", source.display(), e);
                    info.update("Rename failed");
                    let _ = events_tx.send(OpEvent {
                        kind: OpKind::Rename,
                        failed: 1,
                        total: 1,
                        reload: None,
                    });
                }
            }
        });

        Ok(())
    }
}

fn op_summary(op: &str, failed: usize, total: usize) -> String {
    if failed == 0 {
        format!("{} complete ({} files)", op, total)
    } else {
        format!("{}: {} of {} failed", op, failed, total)
    }
}

/// Check a rename target name. Returns the trimmed name on success.
fn validate_new_name(name: &str, current_name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidName("name is empty".into()));
    }
    if name == current_name {
        return Err(AppError::InvalidName("name is unchanged".into()));
    }
    if name.chars().any(|c| RESERVED_CHARS.contains(&c) || std::path::is_separator(c)) {
        return Err(AppError::InvalidName(format!(
            "name contains a reserved character: {}",
            name
        )));
    }
    Ok(name.to_string())
}

/// Append the source file's extension when the new name carries none
fn with_source_extension(new_name: &str, source_name: &str) -> String {
    if new_name.contains('.') {
        return new_name.to_string();
    }
    match source_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => format!("{}.{}", new_name, ext),
        _ => new_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::MemoryInfoSink;
    use app_fs::InProcessBuffer;
    use std::time::Duration;
    use tempfile::TempDir;

    fn service() -> (FileOperationService, Receiver<OpEvent>, Arc<MemoryInfoSink>) {
        let sink = Arc::new(MemoryInfoSink::new());
        let (svc, rx) = FileOperationService::new(
            Arc::new(InProcessBuffer::new()),
            sink.clone(),
        );
        (svc, rx, sink)
    }

    fn wait(rx: &Receiver<OpEvent>) -> OpEvent {
        rx.recv_timeout(Duration::from_secs(5)).expect("operation did not complete")
    }

    #[test]
    fn copy_stages_without_touching_the_filesystem() {
        let (svc, _rx, sink) = service();
        let paths = vec![PathBuf::from("/pics/a.png"), PathBuf::from("/pics/b.jpg")];

        svc.copy(&paths).unwrap();
        assert_eq!(sink.last().as_deref(), Some("Copied 2 files"));
    }

    #[test]
    fn paste_resolves_collisions_and_never_overwrites() {
        let src_dir = TempDir::new().unwrap();
        let dst_dir = TempDir::new().unwrap();
        let src = src_dir.path().join("photo.png");
        std::fs::write(&src, b"fresh").unwrap();
        std::fs::write(dst_dir.path().join("photo.png"), b"original").unwrap();

        let (svc, rx, _) = service();
        svc.copy(&[src]).unwrap();
        svc.paste(dst_dir.path());

        let event = wait(&rx);
        assert_eq!(event.kind, OpKind::Paste);
        assert_eq!(event.failed, 0);
        assert_eq!(event.reload.as_deref(), Some(dst_dir.path()));

        assert_eq!(
            std::fs::read(dst_dir.path().join("photo.png")).unwrap(),
            b"original"
        );
        assert_eq!(
            std::fs::read(dst_dir.path().join("photo (1).png")).unwrap(),
            b"fresh"
        );
    }

    #[test]
    fn paste_skips_non_image_and_missing_paths() {
        let src_dir = TempDir::new().unwrap();
        let dst_dir = TempDir::new().unwrap();
        let image = src_dir.path().join("a.png");
        let text = src_dir.path().join("b.txt");
        std::fs::write(&image, b"img").unwrap();
        std::fs::write(&text, b"txt").unwrap();

        let (svc, rx, _) = service();
        svc.copy(&[image, text, src_dir.path().join("ghost.png")]).unwrap();
        svc.paste(dst_dir.path());

        let event = wait(&rx);
        assert_eq!(event.total, 1);
        assert_eq!(event.failed, 0);
        assert!(dst_dir.path().join("a.png").exists());
        assert!(!dst_dir.path().join("b.txt").exists());
    }

    #[test]
    fn delete_isolates_per_item_failures_and_still_reloads() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        let ghost = dir.path().join("ghost.png"); // already gone, will fail
        std::fs::write(&a, b"x").unwrap();
        std::fs::write(&b, b"x").unwrap();

        let (svc, rx, sink) = service();
        svc.delete(vec![a.clone(), ghost, b.clone()], dir.path().to_path_buf());

        let event = wait(&rx);
        assert_eq!(event.kind, OpKind::Delete);
        assert_eq!(event.total, 3);
        assert_eq!(event.failed, 1);
        assert_eq!(event.reload.as_deref(), Some(dir.path()));
        assert!(!a.exists());
        assert!(!b.exists());
        assert_eq!(sink.last().as_deref(), Some("Delete: 1 of 3 failed"));
    }

    #[test]
    fn rename_appends_source_extension_when_missing() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.jpg");
        std::fs::write(&src, b"x").unwrap();

        let (svc, rx, _) = service();
        svc.rename(&[src.clone()], "b").unwrap();

        let event = wait(&rx);
        assert_eq!(event.failed, 0);
        assert_eq!(event.reload.as_deref(), Some(dir.path()));
        assert!(dir.path().join("b.jpg").exists());
        assert!(!src.exists());
    }

    #[test]
    fn rename_goes_through_collision_resolution() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.jpg");
        std::fs::write(&src, b"x").unwrap();
        std::fs::write(dir.path().join("b.jpg"), b"keep").unwrap();

        let (svc, rx, _) = service();
        svc.rename(&[src], "b.jpg").unwrap();

        let event = wait(&rx);
        assert_eq!(event.failed, 0);
        assert_eq!(std::fs::read(dir.path().join("b.jpg")).unwrap(), b"keep");
        assert!(dir.path().join("b (1).jpg").exists());
    }

    #[test]
    fn rename_validation_rejects_before_any_filesystem_call() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.jpg");
        std::fs::write(&src, b"x").unwrap();

        let (svc, _rx, _) = service();

        for bad in ["", "  ", "a.jpg", "b/c.jpg", "b:c", "b?", "b*", "b\"x\"", "b<y>", "b|z"] {
            assert!(
                matches!(svc.rename(&[src.clone()], bad), Err(AppError::InvalidName(_))),
                "expected rejection for {:?}",
                bad
            );
        }
        assert!(src.exists());
    }

    #[test]
    fn rename_requires_exactly_one_selected_item() {
        let (svc, _rx, _) = service();
        let many = vec![PathBuf::from("/a.png"), PathBuf::from("/b.png")];

        assert!(matches!(svc.rename(&[], "x"), Err(AppError::InvalidName(_))));
        assert!(matches!(svc.rename(&many, "x"), Err(AppError::InvalidName(_))));
    }

    #[test]
    fn failed_rename_leaves_source_untouched() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.jpg");
        // Source vanishes before the worker runs
        let (svc, rx, sink) = service();
        svc.rename(&[src.clone()], "b").unwrap();

        let event = wait(&rx);
        assert_eq!(event.failed, 1);
        assert_eq!(event.reload, None);
        assert_eq!(sink.last().as_deref(), Some("Rename failed"));
    }

    #[test]
    fn extension_fill_in_rules() {
        assert_eq!(with_source_extension("b", "a.jpg"), "b.jpg");
        assert_eq!(with_source_extension("b.png", "a.jpg"), "b.png");
        assert_eq!(with_source_extension("b", "noext"), "b");
    }
}
