use anyhow::{Context, Result};
use estatboard::aggregations::DomainShare;
use estatboard::config::AggregationConfig;
use estatboard::DashboardSession;
use estatboard_client::{load_domains, StatsQuery, StatsSource};

use super::output::{format_percentage, to_json, OutputFormat, TextTable};

pub async fn run_domains(
    source: &dyn StatsSource,
    session: &DashboardSession,
    query: &StatsQuery,
    settings: &AggregationConfig,
    format: OutputFormat,
) -> Result<()> {
    let shares = load_domains(source, session, query, settings)
        .await
        .context("Failed to load domain statistics")?
        .value;

    match format {
        OutputFormat::Table => print!("{}", render_domains(&shares)),
        OutputFormat::Json => println!("{}", to_json(&shares)?),
    }
    Ok(())
}

pub fn render_domains(shares: &[DomainShare]) -> String {
    let mut text = TextTable::new(["Источник", "Объявлений", "Доля"]);
    for share in shares {
        text.push([
            share.domain.clone(),
            share.count.to_string(),
            format_percentage(share.percentage),
        ]);
    }
    let total: u64 = shares.iter().map(|s| s.count).sum();

    let mut out = text.render();
    out.push('\n');
    out.push_str(&format!("Всего {} объявлений из {} источников\n", total, shares.len()));
    out
}
