use async_trait::async_trait;
use estatboard::{CategoryDimension, RealEstateKind};
use serde_json::Value;

use crate::query::StatsQuery;
use crate::Result;

/// Trait for statistics backends (REST API, fixtures, etc.)
///
/// Implementations return the raw JSON rows; decoding and aggregation happen
/// in the caller so that one decoding policy applies to every source.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Grouped counts by room count and category for one kind
    async fn fetch_room_counts(
        &self,
        kind: RealEstateKind,
        dimension: CategoryDimension,
        query: &StatsQuery,
    ) -> Result<Vec<Value>>;

    /// Grouped counts by weekday and hour
    async fn fetch_activity(&self, kind: RealEstateKind, query: &StatsQuery) -> Result<Vec<Value>>;

    /// Grouped counts by source domain
    async fn fetch_domains(&self, query: &StatsQuery) -> Result<Vec<Value>>;

    /// Human-readable source name
    fn source_name(&self) -> &str;
}
