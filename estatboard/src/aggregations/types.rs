use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::PipelineError;
use crate::model::{Category, CategoryDimension, RealEstateKind};

/// Room count from which flats are merged into one "N or more" bucket.
pub const DEFAULT_ROOM_CUTOFF: u32 = 4;

/// Largest accepted cutoff; flats get `cutoff + 1` rows.
pub const MAX_ROOM_CUTOFF: u32 = 20;

/// How the category aggregator treats several records for the same member
/// within one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Add the counts together.
    #[default]
    Sum,
    /// Keep the first record in input order, ignore the rest.
    FirstMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationOptions {
    #[serde(default = "default_cutoff")]
    pub cutoff: u32,
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
}

fn default_cutoff() -> u32 {
    DEFAULT_ROOM_CUTOFF
}

impl Default for AggregationOptions {
    fn default() -> Self {
        Self {
            cutoff: default_cutoff(),
            duplicates: DuplicatePolicy::default(),
        }
    }
}

impl AggregationOptions {
    pub fn with_cutoff(cutoff: u32) -> Self {
        Self {
            cutoff,
            ..Self::default()
        }
    }

    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.cutoff == 0 || self.cutoff > MAX_ROOM_CUTOFF {
            return Err(PipelineError::InvalidCutoff(self.cutoff));
        }
        Ok(())
    }
}

/// Per-member counts of one row, in member order, plus their total.
///
/// Serializes as `{ "owner": 10, "agency": 4, "total": 14 }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCounts {
    entries: Vec<(Category, u64)>,
    total: u64,
}

impl CategoryCounts {
    pub fn zeroed(members: &[Category]) -> Self {
        Self {
            entries: members.iter().map(|&m| (m, 0)).collect(),
            total: 0,
        }
    }

    pub(crate) fn from_entries(entries: Vec<(Category, u64)>) -> Result<Self, PipelineError> {
        let total = checked_sum(entries.iter().map(|(_, count)| *count))?;
        Ok(Self { entries, total })
    }

    /// Count for `category`, zero when it is not a member of this row.
    pub fn get(&self, category: Category) -> u64 {
        self.entries
            .iter()
            .find(|(member, _)| *member == category)
            .map_or(0, |(_, count)| *count)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, u64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn members(&self) -> impl Iterator<Item = Category> + '_ {
        self.entries.iter().map(|(member, _)| *member)
    }

    pub fn is_zero(&self) -> bool {
        self.total == 0
    }
}

impl Serialize for CategoryCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len() + 1))?;
        for (member, count) in &self.entries {
            map.serialize_entry(member.wire_name(), count)?;
        }
        map.serialize_entry("total", &self.total)?;
        map.end()
    }
}

pub(crate) fn checked_sum(counts: impl IntoIterator<Item = u64>) -> Result<u64, PipelineError> {
    counts
        .into_iter()
        .try_fold(0u64, |acc, count| acc.checked_add(count))
        .ok_or(PipelineError::CountOverflow)
}

/// One display row of a statistics table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_count: Option<u32>,
    #[serde(rename = "realEstateKind")]
    pub kind: RealEstateKind,
    pub counts: CategoryCounts,
    pub display_label: String,
}

/// Rows for one (kind, dimension) query together with the parameters that
/// produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomTable {
    pub kind: RealEstateKind,
    pub dimension: CategoryDimension,
    pub cutoff: u32,
    pub rows: Vec<AggregatedRow>,
}

impl RoomTable {
    pub fn members(&self) -> &'static [Category] {
        self.dimension.members()
    }

    /// Sum of all row totals. `build_rows` rejects tables whose grand total
    /// does not fit, so this only saturates for hand-assembled rows.
    pub fn grand_total(&self) -> u64 {
        self.rows
            .iter()
            .fold(0u64, |acc, row| acc.saturating_add(row.counts.total()))
    }

    pub fn row_for_rooms(&self, room_count: u32) -> Option<&AggregatedRow> {
        self.rows.iter().find(|row| row.room_count == Some(room_count))
    }
}
