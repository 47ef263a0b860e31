//! Listing statistics as returned by the backend aggregation queries.

pub mod category;
pub mod kind;
pub mod record;

pub use category::{Category, CategoryDimension};
pub use kind::RealEstateKind;
pub use record::{MissingCount, RawCountRecord, RecordDecoder};
