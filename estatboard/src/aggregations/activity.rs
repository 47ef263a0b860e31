//! Listing activity by weekday and hour of day.

use chrono::Weekday;
use serde::Serialize;
use serde_json::Value;

use crate::error::{PipelineError, ValidationError};
use crate::model::record::{as_object, read_count, read_u32};
use crate::model::MissingCount;

pub const HOURS_PER_DAY: usize = 24;
pub const DAYS_PER_WEEK: usize = 7;

/// Monday-first display order.
pub const WEEK: [Weekday; DAYS_PER_WEEK] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityRecord {
    pub count: u64,
    pub weekday: Weekday,
    pub hour: u32,
}

/// Weekday from the SQL `DOW` convention (0 = Sunday).
pub fn weekday_from_dow(dow: u32) -> Option<Weekday> {
    match dow {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

pub fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Пн",
        Weekday::Tue => "Вт",
        Weekday::Wed => "Ср",
        Weekday::Thu => "Чт",
        Weekday::Fri => "Пт",
        Weekday::Sat => "Сб",
        Weekday::Sun => "Вс",
    }
}

/// Decode `{ "_count": n, "weekday": 0..6, "hour": 0..23 }` records.
pub fn decode_activity(
    items: &[Value],
    missing_count: MissingCount,
) -> Result<Vec<ActivityRecord>, ValidationError> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let obj = as_object(index, item)?;
            let count = read_count(index, obj, missing_count)?;

            let field = |name: &str| {
                obj.get(name)
                    .filter(|v| !v.is_null())
                    .ok_or_else(|| ValidationError::MissingField {
                        index,
                        field: name.to_string(),
                    })
            };
            let out_of_range = |name: &str, v: &Value| ValidationError::OutOfRange {
                index,
                field: name.to_string(),
                value: v.to_string(),
            };

            let raw_weekday = field("weekday")?;
            let weekday = read_u32(raw_weekday)
                .and_then(weekday_from_dow)
                .ok_or_else(|| out_of_range("weekday", raw_weekday))?;

            let raw_hour = field("hour")?;
            let hour = read_u32(raw_hour)
                .filter(|h| (*h as usize) < HOURS_PER_DAY)
                .ok_or_else(|| out_of_range("hour", raw_hour))?;

            Ok(ActivityRecord {
                count,
                weekday,
                hour,
            })
        })
        .collect()
}

/// Zero-filled 7 x 24 grid of listing counts, Monday first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityGrid {
    cells: [[u64; HOURS_PER_DAY]; DAYS_PER_WEEK],
}

impl Default for ActivityGrid {
    fn default() -> Self {
        Self {
            cells: [[0; HOURS_PER_DAY]; DAYS_PER_WEEK],
        }
    }
}

impl ActivityGrid {
    /// Duplicate (weekday, hour) records are summed.
    ///
    /// The whole grid must sum to at most `u64::MAX`, which keeps every row,
    /// column and total below it as well.
    pub fn from_records(records: &[ActivityRecord]) -> Result<Self, PipelineError> {
        let mut grid = Self::default();
        let mut total = 0u64;
        for record in records {
            let hour = record.hour as usize;
            if hour >= HOURS_PER_DAY {
                return Err(PipelineError::HourOutOfRange(record.hour));
            }
            total = total
                .checked_add(record.count)
                .ok_or(PipelineError::CountOverflow)?;
            grid.cells[day_index(record.weekday)][hour] += record.count;
        }
        Ok(grid)
    }

    pub fn get(&self, weekday: Weekday, hour: u32) -> u64 {
        self.cells[day_index(weekday)]
            .get(hour as usize)
            .copied()
            .unwrap_or(0)
    }

    pub fn row(&self, weekday: Weekday) -> &[u64; HOURS_PER_DAY] {
        &self.cells[day_index(weekday)]
    }

    pub fn weekday_total(&self, weekday: Weekday) -> u64 {
        self.row(weekday).iter().sum()
    }

    pub fn weekday_totals(&self) -> [(Weekday, u64); DAYS_PER_WEEK] {
        WEEK.map(|day| (day, self.weekday_total(day)))
    }

    pub fn hour_totals(&self) -> [u64; HOURS_PER_DAY] {
        let mut totals = [0; HOURS_PER_DAY];
        for day in &self.cells {
            for (hour, count) in day.iter().enumerate() {
                totals[hour] += count;
            }
        }
        totals
    }

    pub fn total(&self) -> u64 {
        self.cells.iter().flatten().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Busiest hour across the week; the earliest hour wins ties.
    pub fn peak_hour(&self) -> Option<u32> {
        peak(self.hour_totals().into_iter().enumerate()).map(|(hour, _)| hour as u32)
    }

    /// Busiest weekday; the earliest day (Monday first) wins ties.
    pub fn peak_weekday(&self) -> Option<Weekday> {
        peak(self.weekday_totals().into_iter()).map(|(day, _)| day)
    }
}

fn day_index(weekday: Weekday) -> usize {
    weekday.num_days_from_monday() as usize
}

fn peak<K>(totals: impl Iterator<Item = (K, u64)>) -> Option<(K, u64)> {
    totals
        .filter(|(_, count)| *count > 0)
        .fold(None, |best, (key, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((key, count)),
        })
}
