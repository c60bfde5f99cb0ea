//! Store-side value types: row identifiers and search parameters/results.

mod row_id;
mod search;

pub use row_id::RowId;
pub use search::{SearchKind, SearchPage};
