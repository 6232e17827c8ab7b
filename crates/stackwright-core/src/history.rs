//! # History Manager
//!
//! Linear undo/redo over graph snapshots with a bounded depth.
//!
//! History is an append-only log of shared, immutable snapshots plus a
//! cursor. Entries before the cursor are the "past", entries after it the
//! "future". Pushing a new state truncates the future, so there is no
//! branching.

use crate::primitives::DEFAULT_HISTORY_DEPTH;
use crate::types::Snapshot;
use std::collections::VecDeque;
use std::sync::Arc;

/// Bounded undo/redo log.
#[derive(Debug, Clone)]
pub struct History {
    /// Snapshots, oldest first. Never empty.
    entries: VecDeque<Arc<Snapshot>>,
    /// Index of the current snapshot in `entries`.
    cursor: usize,
    /// Maximum number of past entries kept.
    max_depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl History {
    /// Create a history rooted at the empty graph.
    ///
    /// A `max_depth` of zero is raised to one so that a single undo is
    /// always possible.
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self::with_root(Snapshot::default(), max_depth)
    }

    /// Create a history rooted at the given snapshot.
    #[must_use]
    pub fn with_root(root: Snapshot, max_depth: usize) -> Self {
        let mut entries = VecDeque::with_capacity(2);
        entries.push_back(Arc::new(root));
        Self {
            entries,
            cursor: 0,
            max_depth: max_depth.max(1),
        }
    }

    /// The snapshot the editor currently shows.
    #[must_use]
    pub fn current(&self) -> Arc<Snapshot> {
        // entries is never empty and cursor always indexes it
        Arc::clone(&self.entries[self.cursor])
    }

    /// Record a new current state.
    ///
    /// The previous current state becomes the most recent past entry, all
    /// redo entries are discarded, and the oldest past entry is evicted once
    /// the past grows beyond `max_depth`. Identical snapshots are not
    /// deduplicated.
    pub fn push_state(&mut self, snapshot: Snapshot) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(Arc::new(snapshot));
        self.cursor = self.entries.len() - 1;

        while self.cursor > self.max_depth {
            self.entries.pop_front();
            self.cursor -= 1;
        }
    }

    /// Step back one entry. Returns `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<Arc<Snapshot>> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    /// Step forward one entry. Returns `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<Arc<Snapshot>> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }

    /// Reset both stacks and the current state to the empty graph.
    pub fn clear(&mut self) {
        self.reset(Snapshot::default());
    }

    /// Reset both stacks, adopting `root` as the only entry.
    pub fn reset(&mut self, root: Snapshot) {
        self.entries.clear();
        self.entries.push_back(Arc::new(root));
        self.cursor = 0;
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Number of entries available to undo.
    #[must_use]
    pub fn past_len(&self) -> usize {
        self.cursor
    }

    /// Number of entries available to redo.
    #[must_use]
    pub fn future_len(&self) -> usize {
        self.entries.len() - self.cursor - 1
    }

    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

// =============================================================================
// TESTS
// =============================================================================
