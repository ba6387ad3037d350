use std::collections::BTreeSet;

/// Multi-select over indices of the current media collection.
///
/// Indices only mean something against the collection they were taken from;
/// the owner must call [`SelectionState::clear`] whenever it is replaced.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selected: BTreeSet<usize>,
    last_touched: Option<usize>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips membership of `index` and returns the new membership.
    pub fn toggle(&mut self, index: usize) -> bool {
        if self.selected.remove(&index) {
            false
        } else {
            self.selected.insert(index);
            true
        }
    }

    pub fn add(&mut self, index: usize) {
        self.selected.insert(index);
    }

    pub fn remove(&mut self, index: usize) {
        self.selected.remove(&index);
    }

    pub fn set(&mut self, index: usize, member: bool) -> bool {
        if member {
            self.selected.insert(index)
        } else {
            self.selected.remove(&index)
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    /// Selected indices in ascending order.
    pub fn indices(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }

    pub fn select_all(&mut self, n: usize) {
        self.selected.extend(0..n);
    }

    pub fn deselect_all(&mut self, n: usize) {
        for index in 0..n {
            self.selected.remove(&index);
        }
    }

    /// Applies `member` to every index between `a` and `b` inclusive, in
    /// either order. Returns how many indices actually changed.
    pub fn apply_range(&mut self, a: usize, b: usize, member: bool) -> usize {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        (lo..=hi).filter(|&idx| self.set(idx, member)).count()
    }

    pub fn set_last_touched(&mut self, index: usize) {
        self.last_touched = Some(index);
    }

    pub fn last_touched(&self) -> Option<usize> {
        self.last_touched
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.last_touched = None;
    }
}
