pub mod justified;

pub use justified::{compute_rows, JustifiedLayout, MAX_LAST_ROW_HEIGHT, MIN_ROW_HEIGHT};
