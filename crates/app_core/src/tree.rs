//! Lazy directory tree for the navigation panel
//!
//! Nodes are arena-indexed. Every directory node starts Unresolved; the
//! first expansion request spawns a worker that enumerates readable
//! immediate subdirectories, and applying its result resolves the node
//! exactly once. Collapsing never discards resolved children.

use crate::AppError;
use app_fs::FileEntry;
use crossbeam_channel::{Receiver, Sender};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Handle to a node in the tree arena
pub type NodeId = usize;

/// Expansion state of a directory node.
/// `Unresolved -> Resolved` happens exactly once; there is no reverse edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Unresolved,
    Resolved,
}

/// A node in the directory tree
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// None only for the synthetic root container
    pub path: Option<PathBuf>,
    pub name: String,
    pub state: NodeState,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

impl TreeNode {
    /// Whether the display should show a synthetic placeholder child
    pub fn has_placeholder(&self) -> bool {
        self.state == NodeState::Unresolved
    }
}

/// Result of a background expansion, applied on the control thread
#[derive(Debug, Clone)]
pub enum TreeEvent {
    Expanded {
        node: NodeId,
        children: Vec<FileEntry>,
    },
}

/// Lazily expanded directory tree
pub struct DirectoryTree {
    nodes: Vec<TreeNode>,
    pending: HashSet<NodeId>,
    events_tx: Sender<TreeEvent>,
}

impl DirectoryTree {
    /// Build the tree over the filesystem's volume roots.
    ///
    /// Failure to enumerate volume roots is the one fatal startup error;
    /// callers surface it and leave the tree empty.
    pub fn new() -> Result<(Self, Receiver<TreeEvent>), AppError> {
        let roots = app_fs::volume_roots()
            .map_err(|e| AppError::Init(format!("cannot enumerate volume roots: {}", e)))?;
        Ok(Self::with_roots(roots))
    }

    /// Build the tree over an explicit set of root directories
    pub fn with_roots(roots: Vec<PathBuf>) -> (Self, Receiver<TreeEvent>) {
        let (events_tx, events_rx) = crossbeam_channel::unbounded();

        let mut nodes = vec![TreeNode {
            path: None,
            name: "Computer".to_string(),
            state: NodeState::Resolved, // the container itself has no expansion
            children: Vec::new(),
            parent: None,
        }];

        for root in roots {
            let name = root.display().to_string();
            let id = nodes.len();
            nodes.push(TreeNode {
                path: Some(root),
                name,
                state: NodeState::Unresolved,
                children: Vec::new(),
                parent: Some(0),
            });
            nodes[0].children.push(id);
        }

        (
            Self {
                nodes,
                pending: HashSet::new(),
                events_tx,
            },
            events_rx,
        )
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find the node for a directory path, if it has been materialized
    pub fn find(&self, path: &Path) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.path.as_deref() == Some(path))
    }

    /// Request expansion of a node. Spawns one independent worker for an
    /// Unresolved node; re-expanding a Resolved node (or one with an
    /// expansion already in flight) is a no-op. Returns whether a worker
    /// was spawned.
    pub fn request_expand(&mut self, id: NodeId) -> bool {
        let node = &self.nodes[id];
        if node.state == NodeState::Resolved || self.pending.contains(&id) {
            return false;
        }
        let Some(path) = node.path.clone() else {
            return false;
        };

        self.pending.insert(id);
        let events_tx = self.events_tx.clone();

        std::thread::spawn(move || {
            let children = match app_fs::list_subdirectories(&path) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("Cannot expand {}: {}", path.display(), e);
                    Vec::new()
                }
            };
            let _ = events_tx.send(TreeEvent::Expanded { node: id, children });
        });

        true
    }

    /// Apply a completed expansion: materialize the children and resolve
    /// the node. A second expansion result for an already-Resolved node
    /// is dropped.
    pub fn apply(&mut self, event: TreeEvent) -> Option<NodeId> {
        let TreeEvent::Expanded { node: id, children } = event;
        self.pending.remove(&id);

        if self.nodes[id].state == NodeState::Resolved {
            tracing::debug!("Dropping duplicate expansion for node {}", id);
            return None;
        }

        for entry in children {
            let child_id = self.nodes.len();
            self.nodes.push(TreeNode {
                name: entry.name.clone(),
                path: Some(entry.path),
                state: NodeState::Unresolved,
                children: Vec::new(),
                parent: Some(id),
            });
            self.nodes[id].children.push(child_id);
        }

        self.nodes[id].state = NodeState::Resolved;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn apply_next(tree: &mut DirectoryTree, rx: &Receiver<TreeEvent>) {
        let event = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("expansion did not complete");
        tree.apply(event);
    }

    #[test]
    fn roots_start_unresolved_under_synthetic_container() {
        let dir = TempDir::new().unwrap();
        let (tree, _rx) = DirectoryTree::with_roots(vec![dir.path().to_path_buf()]);

        let root = tree.node(tree.root());
        assert_eq!(root.path, None);
        assert_eq!(root.children.len(), 1);

        let volume = tree.node(root.children[0]);
        assert_eq!(volume.state, NodeState::Unresolved);
        assert!(volume.has_placeholder());
        assert!(volume.children.is_empty());
    }

    #[test]
    fn first_expansion_materializes_subdirectories_only() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("alpha")).unwrap();
        std::fs::create_dir(dir.path().join("beta")).unwrap();
        std::fs::write(dir.path().join("pic.png"), b"x").unwrap();

        let (mut tree, rx) = DirectoryTree::with_roots(vec![dir.path().to_path_buf()]);
        let volume = tree.children(tree.root())[0];

        assert!(tree.request_expand(volume));
        apply_next(&mut tree, &rx);

        let node = tree.node(volume);
        assert_eq!(node.state, NodeState::Resolved);
        assert!(!node.has_placeholder());

        let mut names: Vec<_> = node
            .children
            .iter()
            .map(|&c| tree.node(c).name.clone())
            .collect();
        names.sort();
        assert_eq!(names, vec!["alpha", "beta"]);

        // Children are themselves lazy
        for &c in &tree.node(volume).children.clone() {
            assert_eq!(tree.node(c).state, NodeState::Unresolved);
        }
    }

    #[test]
    fn re_expanding_a_resolved_node_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("alpha")).unwrap();

        let (mut tree, rx) = DirectoryTree::with_roots(vec![dir.path().to_path_buf()]);
        let volume = tree.children(tree.root())[0];

        assert!(tree.request_expand(volume));
        apply_next(&mut tree, &rx);
        assert_eq!(tree.children(volume).len(), 1);

        // Resolved: no worker, no child churn
        assert!(!tree.request_expand(volume));
        assert_eq!(tree.children(volume).len(), 1);
    }

    #[test]
    fn duplicate_in_flight_requests_spawn_one_worker() {
        let dir = TempDir::new().unwrap();
        let (mut tree, rx) = DirectoryTree::with_roots(vec![dir.path().to_path_buf()]);
        let volume = tree.children(tree.root())[0];

        assert!(tree.request_expand(volume));
        assert!(!tree.request_expand(volume));

        apply_next(&mut tree, &rx);
        assert_eq!(tree.node(volume).state, NodeState::Resolved);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn unreadable_directory_expands_to_no_children() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("gone");
        let (mut tree, rx) = DirectoryTree::with_roots(vec![gone]);
        let volume = tree.children(tree.root())[0];

        assert!(tree.request_expand(volume));
        apply_next(&mut tree, &rx);

        let node = tree.node(volume);
        assert_eq!(node.state, NodeState::Resolved);
        assert!(node.children.is_empty());
    }

    #[test]
    fn find_resolves_materialized_paths() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("alpha")).unwrap();

        let (mut tree, rx) = DirectoryTree::with_roots(vec![dir.path().to_path_buf()]);
        let volume = tree.children(tree.root())[0];
        tree.request_expand(volume);
        apply_next(&mut tree, &rx);

        assert_eq!(tree.find(dir.path()), Some(volume));
        assert!(tree.find(&dir.path().join("alpha")).is_some());
        assert_eq!(tree.find(&dir.path().join("missing")), None);
    }
}
