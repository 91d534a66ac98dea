//! Selection state machine over the live display list
//!
//! Selection is keyed by file path, never by object identity; indices are
//! resolved against the ordered display list at gesture time. A rubber-band
//! drag recomputes membership from scratch on every step, fully replacing
//! click-based state while active.

use crate::info::InfoSink;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 2D point in display-surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in display-surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Rectangle spanned by a drag from `start` to `current`, any direction
    pub fn from_drag(start: Point, current: Point) -> Self {
        Self {
            min: Point::new(start.x.min(current.x), start.y.min(current.y)),
            max: Point::new(start.x.max(current.x), start.y.max(current.y)),
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// Selection engine: ordered path-keyed set plus a range anchor
pub struct SelectionEngine {
    selected: Vec<PathBuf>,
    anchor: Option<usize>,
    info: Arc<dyn InfoSink>,
}

impl SelectionEngine {
    pub fn new(info: Arc<dyn InfoSink>) -> Self {
        Self {
            selected: Vec::new(),
            anchor: None,
            info,
        }
    }

    /// Currently selected paths, in selection order
    pub fn selected(&self) -> &[PathBuf] {
        &self.selected
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn is_selected(&self, path: &Path) -> bool {
        self.selected.iter().any(|p| p == path)
    }

    /// Anchor index for range selection, if any
    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    /// Plain click: selection becomes the singleton, anchor moves
    pub fn click(&mut self, display: &[PathBuf], target: &Path) {
        let Some(index) = display.iter().position(|p| p == target) else {
            return;
        };
        self.selected.clear();
        self.selected.push(target.to_path_buf());
        self.anchor = Some(index);
        self.report();
    }

    /// Toggle click: flips membership; anchor moves only when selecting
    pub fn toggle(&mut self, display: &[PathBuf], target: &Path) {
        let Some(index) = display.iter().position(|p| p == target) else {
            return;
        };
        if let Some(pos) = self.selected.iter().position(|p| p == target) {
            self.selected.remove(pos);
        } else {
            self.selected.push(target.to_path_buf());
            self.anchor = Some(index);
        }
        self.report();
    }

    /// Range click: selects the contiguous run between the anchor and the
    /// target, inclusive. The anchor is preserved. Without a prior anchor
    /// this degrades to a plain click.
    pub fn range(&mut self, display: &[PathBuf], target: &Path) {
        let Some(anchor) = self.anchor else {
            self.click(display, target);
            return;
        };
        let Some(index) = display.iter().position(|p| p == target) else {
            return;
        };

        let (start, end) = (anchor.min(index), anchor.max(index).min(display.len() - 1));
        self.selected.clear();
        self.selected.extend(display[start..=end].iter().cloned());
        self.report();
    }

    /// Drag step: selection becomes exactly the items whose bounds
    /// intersect `region`, replacing the prior selection.
    pub fn drag(&mut self, bounds: &[(PathBuf, Rect)], region: &Rect) {
        self.selected.clear();
        self.selected.extend(
            bounds
                .iter()
                .filter(|(_, r)| r.intersects(region))
                .map(|(p, _)| p.clone()),
        );
        self.report();
    }

    /// Select the target if it isn't already, leaving the rest of the
    /// selection intact. Used before opening a context menu on an item.
    pub fn ensure_selected(&mut self, display: &[PathBuf], target: &Path) {
        if self.is_selected(target) {
            return;
        }
        let Some(index) = display.iter().position(|p| p == target) else {
            return;
        };
        self.selected.push(target.to_path_buf());
        self.anchor = Some(index);
        self.report();
    }

    /// Clear the selection (background click, directory reload)
    pub fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
        self.report();
    }

    /// Drop selected keys no longer present in the display list
    pub fn retain_displayed(&mut self, display: &[PathBuf]) {
        self.selected.retain(|p| display.contains(p));
    }

    fn report(&self) {
        self.info.update(&format!("{} selected", self.selected.len()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::MemoryInfoSink;

    fn display(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|n| PathBuf::from(format!("/pics/{n}"))).collect()
    }

    fn engine() -> (SelectionEngine, Arc<MemoryInfoSink>) {
        let sink = Arc::new(MemoryInfoSink::new());
        (SelectionEngine::new(sink.clone()), sink)
    }

    #[test]
    fn plain_click_selects_singleton_and_moves_anchor() {
        let display = display(&["a.png", "b.png", "c.png"]);
        let (mut sel, sink) = engine();

        sel.click(&display, &display[1]);
        assert_eq!(sel.selected(), &display[1..2]);
        assert_eq!(sel.anchor(), Some(1));
        assert_eq!(sink.last().as_deref(), Some("1 selected"));

        sel.click(&display, &display[2]);
        assert_eq!(sel.selected(), &display[2..3]);
        assert_eq!(sel.anchor(), Some(2));
    }

    #[test]
    fn toggle_flips_membership_and_moves_anchor_only_on_select() {
        let display = display(&["a.png", "b.png", "c.png"]);
        let (mut sel, _) = engine();

        sel.toggle(&display, &display[0]);
        sel.toggle(&display, &display[2]);
        assert_eq!(sel.count(), 2);
        assert_eq!(sel.anchor(), Some(2));

        // Deselect: membership flips, anchor stays
        sel.toggle(&display, &display[2]);
        assert!(!sel.is_selected(&display[2]));
        assert_eq!(sel.anchor(), Some(2));
    }

    #[test]
    fn range_selects_inclusive_run_between_anchor_and_target() {
        let display = display(&["a", "b", "c", "d", "e"]);
        let (mut sel, _) = engine();

        sel.click(&display, &display[3]); // anchor = 3
        sel.range(&display, &display[1]);

        assert_eq!(sel.selected(), &display[1..=3]);
        assert_eq!(sel.anchor(), Some(3)); // anchor preserved

        // Range in the other direction from the same anchor
        sel.range(&display, &display[4]);
        assert_eq!(sel.selected(), &display[3..=4]);
    }

    #[test]
    fn range_without_anchor_degrades_to_plain_click() {
        let display = display(&["a", "b", "c"]);
        let (mut sel, _) = engine();

        sel.range(&display, &display[1]);
        assert_eq!(sel.selected(), &display[1..2]);
        assert_eq!(sel.anchor(), Some(1));
    }

    #[test]
    fn drag_replaces_prior_selection_each_step() {
        let display = display(&["a", "b", "c", "d", "e"]);
        let (mut sel, _) = engine();

        // Item i occupies x in [i*10, i*10+8]
        let bounds: Vec<(PathBuf, Rect)> = display
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let x = i as f32 * 10.0;
                (p.clone(), Rect::new(Point::new(x, 0.0), Point::new(x + 8.0, 8.0)))
            })
            .collect();

        sel.click(&display, &display[0]);

        // Drag over items 2 and 3: prior click selection is discarded
        let region = Rect::from_drag(Point::new(21.0, 1.0), Point::new(33.0, 5.0));
        sel.drag(&bounds, &region);
        assert_eq!(sel.selected(), &display[2..=3]);

        // Next step shrinks to item 3 only; not additive
        let region = Rect::from_drag(Point::new(31.0, 1.0), Point::new(33.0, 5.0));
        sel.drag(&bounds, &region);
        assert_eq!(sel.selected(), &display[3..=3]);

        // A subsequent plain click fully replaces drag state
        sel.click(&display, &display[4]);
        assert_eq!(sel.selected(), &display[4..=4]);
    }

    #[test]
    fn clear_empties_selection_and_anchor() {
        let display = display(&["a", "b"]);
        let (mut sel, sink) = engine();

        sel.click(&display, &display[0]);
        sel.clear();
        assert!(sel.is_empty());
        assert_eq!(sel.anchor(), None);
        assert_eq!(sink.last().as_deref(), Some("0 selected"));
    }

    #[test]
    fn ensure_selected_is_additive_and_idempotent() {
        let display = display(&["a", "b", "c"]);
        let (mut sel, _) = engine();

        sel.toggle(&display, &display[0]);
        sel.ensure_selected(&display, &display[2]);
        assert_eq!(sel.count(), 2);

        sel.ensure_selected(&display, &display[2]);
        assert_eq!(sel.count(), 2);
    }

    #[test]
    fn retain_displayed_enforces_subset_invariant() {
        let display = display(&["a", "b", "c"]);
        let (mut sel, _) = engine();

        sel.toggle(&display, &display[0]);
        sel.toggle(&display, &display[2]);

        let shrunk = vec![display[0].clone()];
        sel.retain_displayed(&shrunk);
        assert_eq!(sel.selected(), &shrunk[..]);
    }
}
