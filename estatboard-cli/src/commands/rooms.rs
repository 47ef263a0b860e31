use anyhow::{Context, Result};
use estatboard::config::AggregationConfig;
use estatboard::{CategoryDimension, DashboardSession, RealEstateKind, RoomTable};
use estatboard_client::{load_room_table, StatsQuery, StatsSource};
use serde_json::json;

use super::output::{format_percentage, to_json, OutputFormat, TextTable};

/// Run the rooms command: one row per room bucket, one column per category
pub async fn run_rooms(
    source: &dyn StatsSource,
    session: &DashboardSession,
    kind: RealEstateKind,
    dimension: CategoryDimension,
    query: &StatsQuery,
    settings: &AggregationConfig,
    format: OutputFormat,
) -> Result<()> {
    let loaded = load_room_table(source, session, kind, dimension, query, settings)
        .await
        .with_context(|| format!("Failed to load {} statistics by {}", kind, dimension))?;

    let table = loaded.value;
    tracing::info!(
        rows = table.rows.len(),
        total = table.grand_total(),
        "Aggregated {} listings by {}",
        kind,
        dimension
    );

    match format {
        OutputFormat::Table => print!("{}", render_rooms(&table)),
        OutputFormat::Json => {
            println!(
                "{}",
                to_json(&json!({ "table": &table, "summary": table.summary() }))?
            );
        }
    }
    Ok(())
}

pub fn render_rooms(table: &RoomTable) -> String {
    let members = table.members();
    let first = if table.kind.has_rooms() {
        "Комнаты"
    } else {
        "Тип"
    };

    let mut text = TextTable::new(
        std::iter::once(first.to_string())
            .chain(members.iter().map(|m| m.display_name().to_string()))
            .chain(std::iter::once("Всего".to_string())),
    );
    for row in &table.rows {
        text.push(
            std::iter::once(row.display_label.clone())
                .chain(members.iter().map(|&m| row.counts.get(m).to_string()))
                .chain(std::iter::once(row.counts.total().to_string())),
        );
    }

    let summary = table.summary();
    text.push(
        std::iter::once("Итого".to_string())
            .chain(summary.shares.iter().map(|s| s.total.to_string()))
            .chain(std::iter::once(summary.grand_total.to_string())),
    );

    let shares: Vec<String> = summary
        .shares
        .iter()
        .map(|s| format!("{} {}", s.category.display_name(), format_percentage(s.percentage)))
        .collect();

    let mut out = text.render();
    out.push('\n');
    out.push_str(&shares.join(", "));
    out.push('\n');
    out
}
