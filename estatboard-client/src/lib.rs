//! estatboard-client: fetch listing statistics and feed them through the
//! aggregation pipeline.
//!
//! Supported sources:
//! - the statistics REST API
//! - recorded JSON responses

pub mod error;
pub mod loader;
pub mod query;
pub mod sources;

pub use error::{ClientError, Result};
pub use loader::{load_activity, load_domains, load_room_table, Loaded};
pub use query::StatsQuery;
pub use sources::{FixtureSource, HttpStatsSource, StatsSource};
