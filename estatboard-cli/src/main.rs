use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use estatboard::config::LoggingConfig;
use estatboard::{CategoryDimension, Config, DashboardSession, RealEstateKind};
use estatboard_client::StatsQuery;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "estatboard")]
#[command(about = "Listing statistics from the command line")]
#[command(version)]
struct Cli {
    /// Path to config file (default: ~/.estatboard/config.toml)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
struct FilterArgs {
    /// Only count listings in this city
    #[arg(long)]
    city: Option<String>,

    /// First day of the period (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day of the period (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl FilterArgs {
    fn query(&self) -> Result<StatsQuery> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                anyhow::bail!("--from {} is after --to {}", from, to);
            }
        }
        let mut query = StatsQuery::new().between(self.from, self.to);
        if let Some(city) = &self.city {
            query = query.city(city.clone());
        }
        Ok(query)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Listing counts per room count and category
    Rooms {
        /// Property kind: flat, house or land
        #[arg(short, long)]
        kind: RealEstateKind,

        /// Category split: author or deal-type
        #[arg(short, long, default_value = "author")]
        dimension: CategoryDimension,

        /// Room count at which flats fold into the "N+" row (overrides config)
        #[arg(long)]
        cutoff: Option<u32>,

        #[command(flatten)]
        filters: FilterArgs,

        /// Read the API response from a JSON file instead of the network
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Weekday by hour heatmap of new listings
    Activity {
        /// Property kind: flat, house or land
        #[arg(short, long)]
        kind: RealEstateKind,

        #[command(flatten)]
        filters: FilterArgs,

        /// Read the API response from a JSON file instead of the network
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Share of listings per source domain
    Domains {
        #[command(flatten)]
        filters: FilterArgs,

        /// Read the API response from a JSON file instead of the network
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Write a default configuration file
    InitConfig {
        /// Destination (default: ~/.estatboard/config.toml)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    // stdout carries command output, logs go to stderr
    if logging.format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load().context("Failed to load default config")?,
    };
    config.apply_env();
    config.validate()?;
    Ok(config)
}

fn session_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "cli".to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::InitConfig { path, force } = &cli.command {
        init_logging(&LoggingConfig::default());
        return commands::run_init_config(path.as_deref(), *force);
    }

    let config = load_config(cli.config.as_ref())?;
    init_logging(&config.logging);
    tracing::debug!("Using statistics API at {}", config.api.base_url);

    let session = DashboardSession::new(session_user());

    match cli.command {
        Commands::Rooms {
            kind,
            dimension,
            cutoff,
            filters,
            input,
            format,
        } => {
            let mut settings = config.aggregation.clone();
            if let Some(cutoff) = cutoff {
                settings.cutoff = cutoff;
            }
            let source = commands::open_source(&config, input.as_deref())?;
            commands::run_rooms(
                source.as_ref(),
                &session,
                kind,
                dimension,
                &filters.query()?,
                &settings,
                format,
            )
            .await?;
        }
        Commands::Activity {
            kind,
            filters,
            input,
            format,
        } => {
            let source = commands::open_source(&config, input.as_deref())?;
            commands::run_activity(
                source.as_ref(),
                &session,
                kind,
                &filters.query()?,
                &config.aggregation,
                format,
            )
            .await?;
        }
        Commands::Domains {
            filters,
            input,
            format,
        } => {
            let source = commands::open_source(&config, input.as_deref())?;
            commands::run_domains(
                source.as_ref(),
                &session,
                &filters.query()?,
                &config.aggregation,
                format,
            )
            .await?;
        }
        Commands::InitConfig { .. } => unreachable!("handled before config is loaded"),
    }

    session.logout();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rooms() {
        let cli = Cli::parse_from([
            "estatboard",
            "rooms",
            "--kind",
            "flat",
            "--dimension",
            "deal-type",
            "--cutoff",
            "3",
            "--city",
            "Казань",
            "--from",
            "2024-03-01",
            "--format",
            "json",
        ]);
        match cli.command {
            Commands::Rooms {
                kind,
                dimension,
                cutoff,
                filters,
                format,
                ..
            } => {
                assert_eq!(kind, RealEstateKind::Flat);
                assert_eq!(dimension, CategoryDimension::DealType);
                assert_eq!(cutoff, Some(3));
                assert_eq!(filters.city.as_deref(), Some("Казань"));
                assert_eq!(filters.from, NaiveDate::from_ymd_opt(2024, 3, 1));
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("Expected rooms command, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_kind() {
        assert!(Cli::try_parse_from(["estatboard", "rooms", "--kind", "castle"]).is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["estatboard", "domains", "--config", "/tmp/stats.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/stats.toml")));
    }

    #[test]
    fn test_reversed_period_rejected() {
        let filters = FilterArgs {
            city: None,
            from: NaiveDate::from_ymd_opt(2024, 4, 1),
            to: NaiveDate::from_ymd_opt(2024, 3, 1),
        };
        assert!(filters.query().is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.aggregation.cutoff = 5;
        config.save(&path).unwrap();

        let loaded = load_config(Some(&path)).unwrap();
        assert_eq!(loaded.aggregation.cutoff, 5);

        assert!(load_config(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
