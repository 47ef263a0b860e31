use crate::aggregations::types::{CategoryCounts, DuplicatePolicy};
use crate::error::PipelineError;
use crate::model::{Category, RawCountRecord};

/// Build the complete per-member counts for one bucket.
///
/// Counts are keyed by member position in a single pass; members with no
/// record stay at zero. Records outside `members` are ignored. Sums that do not
/// fit in `u64` fail with [`PipelineError::CountOverflow`].
pub fn aggregate_categories<'a, I>(
    records: I,
    members: &[Category],
    policy: DuplicatePolicy,
) -> Result<CategoryCounts, PipelineError>
where
    I: IntoIterator<Item = &'a RawCountRecord>,
{
    let mut slots: Vec<Option<u64>> = vec![None; members.len()];
    let mut ignored = 0usize;

    for record in records {
        let Some(i) = members
            .iter()
            .position(|member| member.wire_name() == record.category)
        else {
            ignored += 1;
            continue;
        };

        slots[i] = Some(match (slots[i], policy) {
            (None, _) => record.count,
            (Some(acc), DuplicatePolicy::Sum) => acc
                .checked_add(record.count)
                .ok_or(PipelineError::CountOverflow)?,
            (Some(first), DuplicatePolicy::FirstMatch) => first,
        });
    }

    if ignored > 0 {
        tracing::warn!(ignored, "Ignoring records with unrecognized categories");
    }

    CategoryCounts::from_entries(
        members
            .iter()
            .copied()
            .zip(slots.into_iter().map(|slot| slot.unwrap_or(0)))
            .collect(),
    )
}
