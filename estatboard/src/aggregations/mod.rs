//! Reshaping of grouped-count query results into display rows.
//!
//! The flat pipeline runs in three steps: over-cutoff room buckets are united
//! ([`unite_buckets`]), each room bucket is aggregated into complete
//! per-category counts ([`aggregate_categories`]), and the rows are labeled
//! and zero-filled ([`build_rows`]). Everything here is pure and synchronous.

pub mod activity;
mod bucket;
pub mod domains;
pub mod labels;
mod metric;
pub mod types;

pub use activity::{decode_activity, ActivityGrid, ActivityRecord};
pub use bucket::{aggregate, build_rows, unite_buckets};
pub use domains::{decode_domains, domain_shares, DomainRecord, DomainShare};
pub use labels::row_label;
pub use metric::{
    aggregate_categories, percentage, round_percentage, summarize, CategoryShare, Summary,
};
pub use types::{
    AggregatedRow, AggregationOptions, CategoryCounts, DuplicatePolicy, RoomTable,
    DEFAULT_ROOM_CUTOFF, MAX_ROOM_CUTOFF,
};
