use std::ops::Range;

/// One justified row: the half-open index range it covers and its shared
/// height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Row {
    /// Start index in the media list (inclusive)
    pub start: usize,
    /// End index in the media list (exclusive)
    pub end: usize,
    pub height: f64,
}

impl Row {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowItem {
    pub index: usize,
    pub display_w: f64,
    pub display_h: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowModel {
    pub row_index: usize,
    pub height_px: f64,
    pub items: Vec<RowItem>,
}

impl RowModel {
    pub fn new(row_index: usize, height_px: f64, items: Vec<RowItem>) -> Self {
        Self {
            row_index,
            height_px,
            items,
        }
    }
}
