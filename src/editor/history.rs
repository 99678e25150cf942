/// Linear undo/redo stack of snapshots with a cursor.
///
/// The entry under the cursor is the current state. Pushing from
/// anywhere but the tip discards the redo branch.
#[derive(Debug, Clone)]
pub struct History<T: Clone> {
    entries: Vec<T>,
    index: usize,
}

impl<T: Clone> History<T> {
    pub fn new(initial: T) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
        }
    }

    /// Drop every entry and start over from `initial`
    pub fn reset(&mut self, initial: T) {
        self.entries.clear();
        self.entries.push(initial);
        self.index = 0;
    }

    pub fn current(&self) -> &T {
        &self.entries[self.index]
    }

    /// Record a new state after the cursor
    pub fn push(&mut self, state: T) {
        self.entries.truncate(self.index + 1);
        self.entries.push(state);
        self.index = self.entries.len() - 1;
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Step back, returning the state to restore
    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        Some(&self.entries[self.index])
    }

    /// Step forward, returning the state to restore
    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        Some(&self.entries[self.index])
    }
}
