//! Solar viability CLI: evaluate one site or rank a list of parcels.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use solar_viability::config::ScenarioConfig;
use solar_viability::io::export::export_cashflows_csv;
use solar_viability::io::parcels::read_parcels_csv;
use solar_viability::model::evaluate;
use solar_viability::model::types::DEFAULT_USABLE_FRACTION;
use solar_viability::portfolio::rank_parcels;

#[derive(Parser)]
#[command(name = "solar-viability")]
#[command(version, about = "Financial viability of utility-scale solar on a parcel", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a single site and print its cashflows and summary
    Evaluate {
        /// Scenario TOML file
        #[arg(long, conflicts_with = "preset")]
        scenario: Option<PathBuf>,
        /// Built-in preset (see `presets`)
        #[arg(long)]
        preset: Option<String>,
        /// Total parcel acreage
        #[arg(long)]
        acres: Option<f64>,
        /// Usable acreage, overriding acres * usable fraction
        #[arg(long)]
        usable_acres: Option<f64>,
        /// Average peak sun-hours per day
        #[arg(long)]
        sun_hours: Option<f64>,
        /// Distance to the interconnection point (km)
        #[arg(long)]
        grid_km: Option<f64>,
        /// Evaluation horizon (years)
        #[arg(long)]
        lifetime_years: Option<u32>,
        /// Annual discount rate
        #[arg(long)]
        discount_rate: Option<f64>,
        /// Write the cashflow table to this CSV file
        #[arg(long)]
        cashflows_out: Option<PathBuf>,
    },
    /// Evaluate every parcel in a CSV file and list them by NPV
    Rank {
        /// Parcel CSV file
        #[arg(long)]
        parcels: PathBuf,
        /// Scenario TOML file supplying the assumptions
        #[arg(long, conflicts_with = "preset")]
        scenario: Option<PathBuf>,
        /// Built-in preset supplying the assumptions
        #[arg(long)]
        preset: Option<String>,
        /// Share of each parcel's acreage usable for the array
        #[arg(long, default_value_t = DEFAULT_USABLE_FRACTION)]
        usable_fraction: f64,
    },
    /// List built-in presets
    Presets,
    /// Serve the model over HTTP
    #[cfg(feature = "api")]
    Serve {
        /// Scenario TOML file supplying the default assumptions
        #[arg(long, conflicts_with = "preset")]
        scenario: Option<PathBuf>,
        /// Built-in preset supplying the default assumptions
        #[arg(long)]
        preset: Option<String>,
        /// Listen port
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Evaluate {
            scenario,
            preset,
            acres,
            usable_acres,
            sun_hours,
            grid_km,
            lifetime_years,
            discount_rate,
            cashflows_out,
        } => {
            let mut cfg = load_config(scenario.as_deref(), preset.as_deref());
            if let Some(v) = acres {
                cfg.site.acres = v;
            }
            if let Some(v) = usable_acres {
                cfg.site.usable_acres = Some(v);
            }
            if let Some(v) = sun_hours {
                cfg.site.sun_hours_per_day = v;
            }
            if let Some(v) = grid_km {
                cfg.site.grid_distance_km = v;
            }
            if let Some(v) = lifetime_years {
                cfg.finance.lifetime_years = v;
            }
            if let Some(v) = discount_rate {
                cfg.finance.discount_rate = v;
            }
            check_config(&cfg);
            run_evaluate(&cfg, cashflows_out.as_deref());
        }
        Commands::Rank {
            parcels,
            scenario,
            preset,
            usable_fraction,
        } => {
            let cfg = load_config(scenario.as_deref(), preset.as_deref());
            check_config(&cfg);
            run_rank(&cfg, &parcels, usable_fraction);
        }
        Commands::Presets => {
            for name in ScenarioConfig::PRESETS {
                println!("{name}");
            }
        }
        #[cfg(feature = "api")]
        Commands::Serve {
            scenario,
            preset,
            port,
        } => {
            let cfg = load_config(scenario.as_deref(), preset.as_deref());
            check_config(&cfg);
            run_serve(&cfg, port);
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: logging unavailable: {e}");
    }
}

/// Loads the scenario file, the named preset, or the baseline, exiting on
/// failure.
fn load_config(scenario: Option<&Path>, preset: Option<&str>) -> ScenarioConfig {
    let loaded = match (scenario, preset) {
        (Some(path), _) => ScenarioConfig::from_toml_file(path),
        (None, Some(name)) => ScenarioConfig::from_preset(name),
        (None, None) => Ok(ScenarioConfig::baseline()),
    };
    loaded.unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    })
}

fn check_config(cfg: &ScenarioConfig) {
    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("error: {e}");
        }
        process::exit(1);
    }
}

fn run_evaluate(cfg: &ScenarioConfig, cashflows_out: Option<&Path>) {
    let site = cfg.site_inputs();
    let result = evaluate(&site, &cfg.assumptions()).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    });

    for year in &result.cashflows {
        println!("{year}");
    }
    println!();
    println!("{result}");

    if let Some(path) = cashflows_out {
        if let Err(e) = export_cashflows_csv(&result.cashflows, path) {
            eprintln!("error: failed to write cashflows: {e}");
            process::exit(1);
        }
        info!(path = %path.display(), rows = result.cashflows.len(), "cashflows exported");
    }
}

fn run_rank(cfg: &ScenarioConfig, parcels_path: &Path, usable_fraction: f64) {
    let parcels = read_parcels_csv(parcels_path).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    });
    info!(count = parcels.len(), "parcels loaded");

    let ranking =
        rank_parcels(&parcels, &cfg.assumptions(), usable_fraction).unwrap_or_else(|e| {
            eprintln!("error: {e}");
            process::exit(1);
        });

    println!(
        "{:>4}  {:<28} {:>10} {:>16} {:>12} {:>12} {:>10}",
        "rank", "parcel", "MWdc", "NPV (USD)", "payback", "ROI (%)", "tier"
    );
    for (i, entry) in ranking.ranked.iter().enumerate() {
        let r = &entry.result;
        println!(
            "{:>4}  {:<28} {:>10.3} {:>16.2} {:>12} {:>12} {:>10}",
            i + 1,
            entry.parcel.name,
            r.capacity_mw_dc,
            r.npv_usd,
            r.payback_years.to_string(),
            format!("{:.2}", r.lifetime_roi_pct),
            entry
                .parcel
                .tier()
                .map_or_else(|| "-".to_string(), |t| t.to_string()),
        );
    }
    for rejected in &ranking.rejected {
        eprintln!(
            "skipped parcel {} ({}): {}",
            rejected.parcel.id, rejected.parcel.name, rejected.error
        );
    }
}

#[cfg(feature = "api")]
fn run_serve(cfg: &ScenarioConfig, port: u16) {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use solar_viability::api::{self, AppState};

    let state = Arc::new(AppState {
        defaults: cfg.assumptions(),
    });
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("error: failed to start runtime: {e}");
        process::exit(1);
    });
    if let Err(e) = rt.block_on(api::serve(state, addr)) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
