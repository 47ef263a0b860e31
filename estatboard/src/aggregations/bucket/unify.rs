use crate::error::PipelineError;
use crate::model::{Category, RawCountRecord};

/// Collapse every record with `room_count >= cutoff` into one synthetic record
/// per member, with `room_count = cutoff` and the summed count.
///
/// Records below the cutoff, and records without a room count, pass through
/// unchanged. Over-cutoff records whose category is not in `members` are
/// dropped. No synthetic record is emitted for a member that has no
/// over-cutoff input. Fails with [`PipelineError::CountOverflow`] when a
/// merged count does not fit in `u64`.
pub fn unite_buckets(
    records: &[RawCountRecord],
    cutoff: u32,
    members: &[Category],
) -> Result<Vec<RawCountRecord>, PipelineError> {
    let mut united = Vec::with_capacity(records.len());
    let mut over: Vec<Option<u64>> = vec![None; members.len()];
    let mut dropped = 0usize;

    for record in records {
        match record.room_count {
            Some(rooms) if rooms >= cutoff => {
                match members
                    .iter()
                    .position(|member| member.wire_name() == record.category)
                {
                    Some(i) => {
                        let sum = over[i].unwrap_or(0);
                        over[i] = Some(
                            sum.checked_add(record.count)
                                .ok_or(PipelineError::CountOverflow)?,
                        );
                    }
                    None => dropped += 1,
                }
            }
            _ => united.push(record.clone()),
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, cutoff, "Dropped over-cutoff records with unrecognized categories");
    }

    united.extend(
        members
            .iter()
            .zip(over)
            .filter_map(|(member, sum)| {
                sum.map(|count| RawCountRecord::rooms(count, member.wire_name(), cutoff))
            }),
    );

    Ok(united)
}
