use crate::models::{Row, RowItem, RowModel};

/// Hard floor for any row height.
pub const MIN_ROW_HEIGHT: f64 = 85.0;
/// Ceiling applied to the final row only.
pub const MAX_LAST_ROW_HEIGHT: f64 = 280.0;

/// Partitions media into justified rows of roughly `target_row_height`.
///
/// Single forward pass: each row keeps taking items while the summed aspect
/// ratio moves closer to `viewport_width / target_row_height`, and closes at
/// the first item that would move it strictly farther away. An item that
/// overshoots on its own still gets a row to itself, so the pass always makes
/// progress.
///
/// Requires at least one item and strictly positive ratios. Neither is
/// checked.
pub fn compute_rows(aspect_ratios: &[f64], viewport_width: f64, target_row_height: f64) -> Vec<Row> {
    partition(
        aspect_ratios,
        viewport_width,
        target_row_height,
        MIN_ROW_HEIGHT,
        MAX_LAST_ROW_HEIGHT,
    )
}

fn partition(
    ratios: &[f64],
    viewport_width: f64,
    target_row_height: f64,
    min_height: f64,
    max_last_height: f64,
) -> Vec<Row> {
    let target_ratio = viewport_width / target_row_height;
    let mut rows = Vec::new();
    let mut start = 0usize;

    while start < ratios.len() {
        let mut row_ratio = 0.0f64;
        let mut prev_diff = target_ratio;
        let mut end = ratios.len();

        for (i, &ratio) in ratios.iter().enumerate().skip(start) {
            let diff = (target_ratio - (row_ratio + ratio)).abs();
            if diff > prev_diff {
                if i == start {
                    // Lone wide item
                    row_ratio = ratio;
                    end = i + 1;
                } else {
                    end = i;
                }
                break;
            }
            row_ratio += ratio;
            prev_diff = diff;
        }

        rows.push(Row {
            start,
            end,
            height: (viewport_width / row_ratio).max(min_height),
        });
        start = end;
    }

    if let Some(last) = rows.last_mut() {
        last.height = last.height.min(max_last_height);
    }

    rows
}

/// Grid geometry settings shared by the layout pass and item placement.
#[derive(Debug, Clone)]
pub struct JustifiedLayout {
    /// Target row height in pixels (default: 200)
    pub target_height: f64,
    /// Minimum allowed row height in pixels (default: 85)
    pub min_height: f64,
    /// Maximum height of the final row in pixels (default: 280)
    pub max_last_height: f64,
    /// Horizontal margin taken off every item (default: 8)
    pub item_margin: f64,
    /// Narrowest an item may be rendered (default: 50)
    pub min_item_width: f64,
    /// Padding between the window edge and the grid (default: 16)
    pub viewport_padding: f64,
}

impl Default for JustifiedLayout {
    fn default() -> Self {
        Self {
            target_height: 200.0,
            min_height: MIN_ROW_HEIGHT,
            max_last_height: MAX_LAST_ROW_HEIGHT,
            item_margin: 8.0,
            min_item_width: 50.0,
            viewport_padding: 16.0,
        }
    }
}

impl JustifiedLayout {
    /// Width available to the grid inside a window of `window_width`.
    pub fn content_width(&self, window_width: f64) -> f64 {
        (window_width - self.viewport_padding).max(1.0)
    }

    /// Row partition using this layout's target height and height limits.
    pub fn compute_rows(&self, aspect_ratios: &[f64], viewport_width: f64) -> Vec<Row> {
        if aspect_ratios.is_empty() {
            return Vec::new();
        }
        partition(
            aspect_ratios,
            viewport_width,
            self.target_height,
            self.min_height,
            self.max_last_height,
        )
    }

    /// Turns a row partition into per-item display sizes.
    ///
    /// Each item is `height * ratio` wide, less the margin, but never narrower
    /// than `min_item_width`.
    pub fn place(&self, aspect_ratios: &[f64], rows: &[Row]) -> Vec<RowModel> {
        rows.iter()
            .enumerate()
            .map(|(row_idx, row)| {
                let items = row
                    .range()
                    .map(|index| RowItem {
                        index,
                        display_w: (row.height * aspect_ratios[index] - self.item_margin)
                            .max(self.min_item_width),
                        display_h: row.height,
                    })
                    .collect();
                RowModel::new(row_idx, row.height, items)
            })
            .collect()
    }

    /// Calculates the total height of all rows.
    /// Useful for scroll calculations.
    pub fn total_height(&self, rows: &[Row], row_gap: f64) -> f64 {
        if rows.is_empty() {
            return 0.0;
        }

        let heights_sum: f64 = rows.iter().map(|r| r.height).sum();
        let gaps_sum = (rows.len() - 1) as f64 * row_gap;
        heights_sum + gaps_sum
    }
}
