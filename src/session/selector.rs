//! Cyclic selection over the generated candidates.

/// Navigation direction through the candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Cursor over a non-empty list. The selected index is always in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector {
    selected: usize,
    len: usize,
}

impl Selector {
    /// Cursor at index 0 over `len` items. `None` for an empty list.
    pub fn new(len: usize) -> Option<Self> {
        (len > 0).then_some(Self { selected: 0, len })
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Move one step, wrapping at both ends. Returns the new index.
    pub fn advance(&mut self, direction: Direction) -> usize {
        self.selected = match direction {
            Direction::Next => (self.selected + 1) % self.len,
            Direction::Previous => (self.selected + self.len - 1) % self.len,
        };
        self.selected
    }

    /// The item under the cursor.
    pub fn activate<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        items.get(self.selected)
    }
}
