pub mod filter;
pub mod gesture;
pub mod selection;

pub use filter::{FilterState, TagState};
pub use gesture::{GestureRecognizer, GestureState};
pub use selection::SelectionState;
