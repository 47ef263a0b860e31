pub mod activity;
pub mod domains;
pub mod init_config;
pub mod output;
pub mod rooms;

pub use activity::run_activity;
pub use domains::run_domains;
pub use init_config::run_init_config;
pub use rooms::run_rooms;

use anyhow::{Context, Result};
use estatboard::Config;
use estatboard_client::{FixtureSource, HttpStatsSource, StatsSource};
use std::path::Path;

/// A recorded response file when `--input` is given, the API otherwise.
pub fn open_source(config: &Config, input: Option<&Path>) -> Result<Box<dyn StatsSource>> {
    match input {
        Some(path) => {
            let source = FixtureSource::from_path(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            tracing::info!("Loaded {} rows from {}", source.rows().len(), path.display());
            Ok(Box::new(source))
        }
        None => {
            let source = HttpStatsSource::from_config(&config.api)
                .context("Failed to set up the statistics API client")?;
            Ok(Box::new(source))
        }
    }
}
