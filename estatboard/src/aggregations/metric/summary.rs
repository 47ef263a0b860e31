use serde::Serialize;

use crate::aggregations::types::{AggregatedRow, RoomTable};
use crate::model::Category;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: Category,
    pub total: u64,
    /// `None` when nothing was counted at all.
    pub percentage: Option<f64>,
}

/// Column totals across all rows of a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub shares: Vec<CategoryShare>,
    pub grand_total: u64,
}

impl Summary {
    pub fn share(&self, category: Category) -> Option<&CategoryShare> {
        self.shares.iter().find(|s| s.category == category)
    }
}

/// Column totals saturate at `u64::MAX`; rows from `build_rows` never get there.
pub fn summarize(rows: &[AggregatedRow], members: &[Category]) -> Summary {
    let totals: Vec<(Category, u64)> = members
        .iter()
        .map(|&member| {
            let total = rows
                .iter()
                .fold(0u64, |acc, row| acc.saturating_add(row.counts.get(member)));
            (member, total)
        })
        .collect();
    let grand_total = totals
        .iter()
        .fold(0u64, |acc, (_, total)| acc.saturating_add(*total));

    Summary {
        shares: totals
            .into_iter()
            .map(|(category, total)| CategoryShare {
                category,
                total,
                percentage: percentage(total, grand_total),
            })
            .collect(),
        grand_total,
    }
}

/// `100 * part / whole`, or `None` when `whole` is zero.
pub fn percentage(part: u64, whole: u64) -> Option<f64> {
    if whole == 0 {
        return None;
    }
    Some(100.0 * part as f64 / whole as f64)
}

pub fn round_percentage(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

impl RoomTable {
    pub fn summary(&self) -> Summary {
        summarize(&self.rows, self.members())
    }
}
