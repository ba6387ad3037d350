pub mod media_collection;
pub mod media_item;
pub mod query;
pub mod row_model;

pub use media_collection::*;
pub use media_item::*;
pub use query::*;
pub use row_model::*;
