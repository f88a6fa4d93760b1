use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use rental_insights::{loader, AnalyticsConfig, Dashboard, FilterParams, Section};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rental-insights")]
#[command(about = "Rental analytics over a star-schema CSV export")]
struct Args {
    /// Directory holding fact_rental.csv and the dim_*.csv files
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// First day of the range (YYYY-MM-DD); defaults to the earliest date
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last day of the range (YYYY-MM-DD); defaults to the latest date
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Restrict to these stores (repeatable)
    #[arg(long = "store")]
    stores: Vec<i64>,

    /// Sections to compute (repeatable): top-customers, monthly-category,
    /// store-performance, inventory, duration-by-category
    #[arg(long = "section")]
    sections: Vec<Section>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = AnalyticsConfig::from_env()?;

    info!("Rental insights starting...");
    let tables = loader::load_tables(&args.data_dir, &config)
        .with_context(|| format!("failed to load tables from {}", args.data_dir.display()))?;

    let bounds = tables.date_bounds();
    let start = args
        .start
        .or(bounds.map(|b| b.min))
        .context("no --start given and the date dimension is empty")?;
    let end = args
        .end
        .or(bounds.map(|b| b.max))
        .context("no --end given and the date dimension is empty")?;

    let params = FilterParams::new(start, end)?
        .with_stores(args.stores)
        .with_sections(args.sections);

    let report = Dashboard::new(config).run(&tables, &params)?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", json);

    Ok(())
}
