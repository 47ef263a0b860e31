mod categories;
mod summary;

pub use categories::aggregate_categories;
pub use summary::{percentage, round_percentage, summarize, CategoryShare, Summary};
