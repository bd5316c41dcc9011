use crate::surface::Surface;

/// How many snapshots are retained before the oldest is dropped.
pub const DEFAULT_HISTORY_CAP: usize = 10;

/// One full-surface state, taken after a completed mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    surface: Surface,
}

impl Snapshot {
    fn of(surface: &Surface) -> Self {
        Self { surface: surface.clone() }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }
}

/// Bounded undo/redo history over full-surface snapshots.
///
/// A cursor walks a single vector of snapshots. Capturing while the cursor
/// sits behind the newest entry discards the redo branch first; capturing at
/// capacity evicts the oldest entry. The first snapshot is the floor: undo
/// never steps past it.
#[derive(Debug, Clone)]
pub struct SnapshotHistory {
    entries: Vec<Snapshot>,
    step: usize,
    cap: usize,
}

impl SnapshotHistory {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: Vec::new(),
            step: 0,
            cap: cap.max(1),
        }
    }

    /// Records the surface as the new newest snapshot and moves the cursor
    /// onto it.
    pub fn capture(&mut self, surface: &Surface) {
        self.entries.truncate(self.step + 1);
        self.entries.push(Snapshot::of(surface));
        if self.entries.len() > self.cap {
            self.entries.remove(0);
        }
        self.step = self.entries.len() - 1;
    }

    /// Steps the cursor back one snapshot, or reports `None` at the floor.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.entries.is_empty() || self.step == 0 {
            return None;
        }
        self.step -= 1;
        Some(&self.entries[self.step])
    }

    /// Steps the cursor forward one snapshot, or reports `None` at the tip.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.entries.is_empty() || self.step + 1 >= self.entries.len() {
            return None;
        }
        self.step += 1;
        Some(&self.entries[self.step])
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.step > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.entries.is_empty() && self.step + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cursor position, only meaningful while the history is non-empty.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Drops every snapshot. Used when the surface is rebuilt at a new size
    /// and old states no longer apply.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.step = 0;
    }
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAP)
    }
}
