//! Snapshot-based undo/redo.
//!
//! Each entry is a deep copy of the page tree plus the current page index.
//! Image pixels are shared behind `Arc`s, so cloning a 50-deep stack stays
//! cheap. The stack is seeded with the opening state; undo at the seed and
//! redo at the tail are no-ops.

use crate::model::Page;
use crate::scene::Scene;
use proofmark_core::constants::HISTORY_DEPTH;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub pages: Vec<Page>,
    pub current_page: usize,
}

impl HistoryEntry {
    fn capture(scene: &Scene) -> Self {
        Self {
            pages: scene.pages().to_vec(),
            current_page: scene.current_page_index(),
        }
    }

    fn restore(&self, scene: &mut Scene) {
        let previous_layer = scene.current_layer_id();
        if let Ok(restored) = Scene::new(self.pages.clone()) {
            *scene = restored;
            scene.set_current_page(self.current_page);
            // Keep the working layer across undo/redo when it still exists.
            scene.set_current_layer(previous_layer);
        }
    }
}

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    index: usize,
}

impl History {
    /// Seeds the stack with the scene's opening state.
    pub fn new(scene: &Scene) -> Self {
        Self {
            entries: vec![HistoryEntry::capture(scene)],
            index: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Captures the scene after a committed edit. Any redo tail is
    /// discarded; the stack keeps at most [`HISTORY_DEPTH`] entries,
    /// dropping the oldest.
    pub fn snapshot(&mut self, scene: &Scene) {
        self.entries.truncate(self.index + 1);
        self.entries.push(HistoryEntry::capture(scene));
        if self.entries.len() > HISTORY_DEPTH {
            let excess = self.entries.len() - HISTORY_DEPTH;
            self.entries.drain(..excess);
        }
        self.index = self.entries.len() - 1;
        debug!(depth = self.entries.len(), "history snapshot");
    }

    /// Steps back one entry, restoring it into `scene`. No-op at the
    /// oldest entry.
    pub fn undo(&mut self, scene: &mut Scene) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.index -= 1;
        self.entries[self.index].restore(scene);
        true
    }

    /// Steps forward one entry. No-op at the newest entry.
    pub fn redo(&mut self, scene: &mut Scene) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.index += 1;
        self.entries[self.index].restore(scene);
        true
    }

    /// Collapses the stack to a single entry holding the current state.
    pub fn clear(&mut self, scene: &Scene) {
        self.entries = vec![HistoryEntry::capture(scene)];
        self.index = 0;
    }
}
