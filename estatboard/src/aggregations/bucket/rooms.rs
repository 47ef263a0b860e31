use crate::aggregations::bucket::unify::unite_buckets;
use crate::aggregations::labels::row_label;
use crate::aggregations::metric::aggregate_categories;
use crate::aggregations::types::{checked_sum, AggregatedRow, AggregationOptions, RoomTable};
use crate::error::PipelineError;
use crate::model::{CategoryDimension, RawCountRecord, RealEstateKind};

/// Build the zero-filled, labeled rows for one real-estate kind.
///
/// Flats always yield `cutoff + 1` rows sorted by room count `0..=cutoff`.
/// Houses and land yield exactly one row with no room count, aggregated over
/// every record regardless of its room count.
///
/// Fails with [`PipelineError::CountOverflow`] when any row or the table as
/// a whole holds more listings than `u64` can count.
pub fn build_rows(
    records: &[RawCountRecord],
    kind: RealEstateKind,
    dimension: CategoryDimension,
    options: &AggregationOptions,
) -> Result<Vec<AggregatedRow>, PipelineError> {
    options.validate()?;
    let members = dimension.members();

    if !kind.has_rooms() {
        let counts = aggregate_categories(records, members, options.duplicates)?;
        return Ok(vec![AggregatedRow {
            room_count: None,
            kind,
            counts,
            display_label: row_label(kind, None, options.cutoff),
        }]);
    }

    let united = unite_buckets(records, options.cutoff, members)?;

    let unbucketed = united.iter().filter(|r| r.room_count.is_none()).count();
    if unbucketed > 0 {
        tracing::debug!(unbucketed, "Flat records without roomCount fall outside every bucket");
    }

    let rows = (0..=options.cutoff)
        .map(|rooms| {
            let bucket = united.iter().filter(|r| r.room_count == Some(rooms));
            Ok(AggregatedRow {
                room_count: Some(rooms),
                kind,
                counts: aggregate_categories(bucket, members, options.duplicates)?,
                display_label: row_label(kind, Some(rooms), options.cutoff),
            })
        })
        .collect::<Result<Vec<_>, PipelineError>>()?;
    checked_sum(rows.iter().map(|row| row.counts.total()))?;

    tracing::debug!(
        records = records.len(),
        rows = rows.len(),
        cutoff = options.cutoff,
        %dimension,
        "Built flat rows"
    );

    Ok(rows)
}

/// Shorthand for [`build_rows`] with default options and an optional cutoff.
pub fn aggregate(
    records: &[RawCountRecord],
    kind: RealEstateKind,
    dimension: CategoryDimension,
    cutoff: Option<u32>,
) -> Result<Vec<AggregatedRow>, PipelineError> {
    let options = cutoff
        .map(AggregationOptions::with_cutoff)
        .unwrap_or_default();
    build_rows(records, kind, dimension, &options)
}

impl RoomTable {
    pub fn build(
        records: &[RawCountRecord],
        kind: RealEstateKind,
        dimension: CategoryDimension,
        options: &AggregationOptions,
    ) -> Result<Self, PipelineError> {
        Ok(Self {
            kind,
            dimension,
            cutoff: options.cutoff,
            rows: build_rows(records, kind, dimension, options)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregations::types::DuplicatePolicy;
    use crate::model::Category;

    fn scenario() -> Vec<RawCountRecord> {
        vec![
            RawCountRecord::rooms(10, "owner", 0),
            RawCountRecord::rooms(4, "agency", 0),
            RawCountRecord::rooms(2, "owner", 5),
            RawCountRecord::rooms(1, "owner", 6),
        ]
    }

    #[test]
    fn test_flat_scenario() {
        let rows = aggregate(&scenario(), RealEstateKind::Flat, CategoryDimension::Author, Some(4))
            .unwrap();

        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].counts.get(Category::Owner), 10);
        assert_eq!(rows[0].counts.get(Category::Agency), 4);
        assert_eq!(rows[0].counts.total(), 14);
        for row in &rows[1..4] {
            assert!(row.counts.is_zero());
        }
        assert_eq!(rows[4].room_count, Some(4));
        assert_eq!(rows[4].counts.get(Category::Owner), 3);
        assert_eq!(rows[4].counts.get(Category::Agency), 0);
        assert_eq!(rows[4].counts.total(), 3);
        assert_eq!(rows[4].display_label, "Квартира 4-ком.+");
    }

    #[test]
    fn test_flat_rows_sorted_by_rooms() {
        let rows =
            aggregate(&[], RealEstateKind::Flat, CategoryDimension::DealType, Some(6)).unwrap();
        let rooms: Vec<_> = rows.iter().map(|r| r.room_count).collect();
        assert_eq!(rooms, (0..=6).map(Some).collect::<Vec<_>>());
        assert!(rows.iter().all(|r| r.counts.is_zero()));
        assert!(rows.iter().all(|r| r.counts.iter().count() == 3));
    }

    #[test]
    fn test_house_single_row() {
        let records = vec![
            RawCountRecord::whole(5, "sale"),
            RawCountRecord::rooms(2, "rentLong", 3),
            RawCountRecord::whole(9, "barter"),
        ];
        let rows =
            aggregate(&records, RealEstateKind::House, CategoryDimension::DealType, None).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].room_count, None);
        assert_eq!(rows[0].counts.total(), 7);
        assert_eq!(rows[0].display_label, "Загородный дом");
    }

    #[test]
    fn test_land_aggregates_like_house() {
        let records = vec![RawCountRecord::whole(5, "owner")];
        let rows =
            aggregate(&records, RealEstateKind::Land, CategoryDimension::Author, None).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, RealEstateKind::Land);
        assert_eq!(rows[0].counts.get(Category::Owner), 5);
    }

    #[test]
    fn test_zero_cutoff_rejected() {
        let err = aggregate(&[], RealEstateKind::Flat, CategoryDimension::Author, Some(0))
            .unwrap_err();
        assert_eq!(err, PipelineError::InvalidCutoff(0));
    }

    #[test]
    fn test_first_match_policy() {
        let records = vec![
            RawCountRecord::rooms(1, "owner", 2),
            RawCountRecord::rooms(6, "owner", 2),
        ];
        let options = AggregationOptions::default().duplicates(DuplicatePolicy::FirstMatch);
        let rows = build_rows(&records, RealEstateKind::Flat, CategoryDimension::Author, &options)
            .unwrap();
        assert_eq!(rows[2].counts.get(Category::Owner), 1);
    }

    #[test]
    fn test_room_table() {
        let table = RoomTable::build(
            &scenario(),
            RealEstateKind::Flat,
            CategoryDimension::Author,
            &AggregationOptions::default(),
        )
        .unwrap();
        assert_eq!(table.grand_total(), 17);
        assert_eq!(table.row_for_rooms(4).unwrap().counts.total(), 3);
        assert!(table.row_for_rooms(5).is_none());
    }

    #[test]
    fn test_count_overflow_rejected() {
        let split = vec![
            RawCountRecord::rooms(u64::MAX, "owner", 1),
            RawCountRecord::rooms(1, "owner", 2),
        ];
        assert_eq!(
            aggregate(&split, RealEstateKind::Flat, CategoryDimension::Author, Some(4)),
            Err(PipelineError::CountOverflow)
        );

        let house = vec![
            RawCountRecord::whole(u64::MAX, "owner"),
            RawCountRecord::whole(1, "owner"),
        ];
        assert_eq!(
            aggregate(&house, RealEstateKind::House, CategoryDimension::Author, None),
            Err(PipelineError::CountOverflow)
        );
    }

    #[test]
    fn test_cutoff_above_bound_rejected() {
        let err = aggregate(&[], RealEstateKind::Flat, CategoryDimension::Author, Some(u32::MAX))
            .unwrap_err();
        assert_eq!(err, PipelineError::InvalidCutoff(u32::MAX));
    }
}
