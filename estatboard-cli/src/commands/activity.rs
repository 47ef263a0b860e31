use anyhow::{Context, Result};
use estatboard::aggregations::activity::{weekday_label, HOURS_PER_DAY, WEEK};
use estatboard::aggregations::ActivityGrid;
use estatboard::config::AggregationConfig;
use estatboard::{DashboardSession, RealEstateKind};
use estatboard_client::{load_activity, StatsQuery, StatsSource};
use serde_json::json;

use super::output::{to_json, OutputFormat, TextTable};

pub async fn run_activity(
    source: &dyn StatsSource,
    session: &DashboardSession,
    kind: RealEstateKind,
    query: &StatsQuery,
    settings: &AggregationConfig,
    format: OutputFormat,
) -> Result<()> {
    let grid = load_activity(source, session, kind, query, settings)
        .await
        .with_context(|| format!("Failed to load {} activity", kind))?
        .value;

    match format {
        OutputFormat::Table => print!("{}", render_activity(&grid)),
        OutputFormat::Json => {
            let days: Vec<_> = WEEK
                .iter()
                .map(|&day| {
                    json!({
                        "weekday": weekday_label(day),
                        "hours": grid.row(day),
                        "total": grid.weekday_total(day),
                    })
                })
                .collect();
            println!(
                "{}",
                to_json(&json!({
                    "kind": kind,
                    "days": days,
                    "hourTotals": grid.hour_totals(),
                    "total": grid.total(),
                }))?
            );
        }
    }
    Ok(())
}

pub fn render_activity(grid: &ActivityGrid) -> String {
    let mut text = TextTable::new(
        std::iter::once("День".to_string())
            .chain((0..HOURS_PER_DAY).map(|h| h.to_string()))
            .chain(std::iter::once("Всего".to_string())),
    );
    for day in WEEK {
        text.push(
            std::iter::once(weekday_label(day).to_string())
                .chain(grid.row(day).iter().map(u64::to_string))
                .chain(std::iter::once(grid.weekday_total(day).to_string())),
        );
    }

    let mut out = text.render();
    out.push('\n');
    match (grid.peak_weekday(), grid.peak_hour()) {
        (Some(day), Some(hour)) => out.push_str(&format!(
            "Всего {}, пик: {} и {}:00\n",
            grid.total(),
            weekday_label(day),
            hour
        )),
        _ => out.push_str("Нет объявлений за период\n"),
    }
    out
}
