//! Undo/redo history of full scene snapshots.

use crate::scene::SceneData;

/// Default maximum number of snapshots kept.
pub const MAX_HISTORY: usize = 50;

/// Bounded snapshot log with a cursor.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<SceneData>,
    /// Index of the current snapshot; `None` while empty.
    cursor: Option<usize>,
    capacity: usize,
    /// Set while a snapshot is being replayed so replay never records.
    replaying: bool,
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_HISTORY)
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            snapshots: Vec::new(),
            cursor: None,
            capacity: capacity.max(1),
            replaying: false,
        }
    }

    /// Record a snapshot after the cursor, discarding any redo branch.
    ///
    /// Returns `false` if nothing was recorded: during replay, or when the
    /// snapshot equals the current one.
    pub fn push(&mut self, snapshot: SceneData) -> bool {
        if self.replaying {
            return false;
        }
        if self.current() == Some(&snapshot) {
            return false;
        }
        if let Some(cursor) = self.cursor {
            self.snapshots.truncate(cursor + 1);
        }
        self.snapshots.push(snapshot);
        if self.snapshots.len() > self.capacity {
            self.snapshots.remove(0);
        }
        self.cursor = Some(self.snapshots.len() - 1);
        true
    }

    /// Step back and return the snapshot to restore.
    pub fn undo(&mut self) -> Option<SceneData> {
        let cursor = self.cursor.filter(|&c| c > 0)?;
        self.cursor = Some(cursor - 1);
        self.snapshots.get(cursor - 1).cloned()
    }

    /// Step forward and return the snapshot to restore.
    pub fn redo(&mut self) -> Option<SceneData> {
        let next = self.cursor.map_or(0, |c| c + 1);
        if next >= self.snapshots.len() {
            return None;
        }
        self.cursor = Some(next);
        self.snapshots.get(next).cloned()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.snapshots.len())
    }

    pub fn current(&self) -> Option<&SceneData> {
        self.cursor.and_then(|c| self.snapshots.get(c))
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn is_replaying(&self) -> bool {
        self.replaying
    }

    /// Mark the start or end of a replay.
    pub fn set_replaying(&mut self, replaying: bool) {
        self.replaying = replaying;
    }

    /// Drop everything and start over from one snapshot.
    pub fn reset(&mut self, snapshot: SceneData) {
        self.snapshots = vec![snapshot];
        self.cursor = Some(0);
    }
}
