//! # Site Atlas CLI (`atlas`)
//!
//! The `atlas` binary loads a site dataset, serves it to the map and filter
//! controls over HTTP, and offers a few operator commands for checking a
//! dataset and trying filters from the shell.
//!
//! ## Usage
//!
//! ```bash
//! atlas --config ./config/atlas.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `atlas serve` | Start the HTTP server |
//! | `atlas check` | Load the dataset and print counts and the option index |
//! | `atlas filter` | Apply filters and print the derived view |
//! | `atlas periods` | Print the period table |
//!
//! ## Examples
//!
//! ```bash
//! # Validate a dataset before serving it
//! atlas check --config ./config/atlas.toml
//!
//! # Classical Doric buildings only
//! atlas filter --order Doric --period classical
//!
//! # Same, as GeoJSON
//! atlas filter --order Doric --period classical --json
//! ```

use clap::{Parser, Subcommand};
use site_atlas::filter_cmd::FilterRequest;
use site_atlas::{check, config, filter_cmd, logging, periods_cmd, server};
use site_atlas_core::models::Attribute;
use site_atlas_core::periods::PeriodId;
use std::path::{Path, PathBuf};

/// Site Atlas CLI: filter and explore archaeological sites by order,
/// typology, age and historical period.
///
/// All commands except `periods` read a TOML configuration file given by
/// `--config`. See `config/atlas.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "atlas",
    about = "Site Atlas: filter and explore archaeological sites by order, typology, age and period",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/atlas.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    ///
    /// Binds to `[server].bind` and loads the dataset in the background;
    /// data endpoints answer `503 loading` until it arrives.
    Serve,

    /// Load the dataset and print site/building counts and the option index.
    ///
    /// Exits non-zero if the dataset cannot be read or fails validation.
    Check,

    /// Apply filters and print the resulting view.
    ///
    /// Values within one attribute are OR-ed; attributes are AND-ed; the
    /// period further restricts by age tag.
    Filter {
        /// Architectural order (repeatable).
        #[arg(long)]
        order: Vec<String>,

        /// Typology / morphology (repeatable).
        #[arg(long, alias = "typology")]
        morphology: Vec<String>,

        /// Age tag (repeatable).
        #[arg(long)]
        age: Vec<String>,

        /// Date (repeatable).
        #[arg(long)]
        date: Vec<String>,

        /// Period id: archaic, classical, hellenistic, republican,
        /// early_empire or late_empire.
        #[arg(long, value_parser = parse_period)]
        period: Option<PeriodId>,

        /// Print the derived view as GeoJSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the period table and timeline extent.
    Periods,
}

fn parse_period(s: &str) -> Result<PeriodId, String> {
    s.parse::<PeriodId>().map_err(|e| e.to_string())
}

/// Load the config and install logging; every command but `periods` needs both.
fn load(path: &Path) -> anyhow::Result<config::Config> {
    let cfg = config::load_config(path)?;
    logging::init(&cfg.logging.filter)?;
    Ok(cfg)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Periods => {
            periods_cmd::run_periods();
        }
        Commands::Serve => {
            let cfg = load(&cli.config)?;
            server::run_server(&cfg).await?;
        }
        Commands::Check => {
            let cfg = load(&cli.config)?;
            check::run_check(&cfg).await?;
        }
        Commands::Filter {
            order,
            morphology,
            age,
            date,
            period,
            json,
        } => {
            let cfg = load(&cli.config)?;
            let values = [
                (Attribute::Order, order),
                (Attribute::Morphology, morphology),
                (Attribute::Age, age),
                (Attribute::Date, date),
            ]
            .into_iter()
            .flat_map(|(attribute, values)| values.into_iter().map(move |v| (attribute, v)))
            .collect();
            filter_cmd::run_filter(
                &cfg,
                FilterRequest {
                    values,
                    period,
                    json,
                },
            )
            .await?;
        }
    }

    Ok(())
}
