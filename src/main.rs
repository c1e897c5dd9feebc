use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use std::env;
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use flow_metrics::{
    build_report, load_work_items_csv, ChartRequest, Dataset, EngineConfig, Granularity, ReportKind,
};

const USAGE: &str = "\
Usage:
  flow-metrics <dataset.json> <report> <start YYYY-MM-DD> <end YYYY-MM-DD> <day|week|month> [config.json]
  flow-metrics import <work_items.csv> <dataset.json>

Reports: operational, strategic, status, portfolio, team";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() > 1 && args[1] == "import" {
        // Import mode
        run_import(&args[2..])?;
    } else {
        // Report mode (default)
        run_report(&args[1..])?;
    }

    Ok(())
}

fn run_import(args: &[String]) -> Result<()> {
    if args.len() < 2 {
        bail!("{}", USAGE);
    }

    eprintln!("📂 Loading work items from {}...", args[0]);
    let work_items = load_work_items_csv(Path::new(&args[0]))?;
    eprintln!("✓ Loaded {} work items", work_items.len());

    // Merge into an existing dataset when there is one
    let out_path = Path::new(&args[1]);
    let mut dataset = if out_path.exists() {
        Dataset::from_file(out_path)?
    } else {
        Dataset::default()
    };
    dataset.work_items = work_items;

    let json = serde_json::to_string_pretty(&dataset).context("Failed to serialize dataset")?;
    fs::write(out_path, json).with_context(|| format!("Failed to write dataset: {:?}", out_path))?;
    eprintln!("💾 Dataset written to {:?}", out_path);

    Ok(())
}

fn run_report(args: &[String]) -> Result<()> {
    if args.len() < 5 {
        bail!("{}", USAGE);
    }

    let dataset = Dataset::from_file(&args[0])?;
    let kind: ReportKind = args[1].parse()?;
    let start = parse_date(&args[2])?;
    let end = parse_date(&args[3])?;
    let granularity: Granularity = args[4].parse()?;
    let config = match args.get(5) {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    eprintln!(
        "📊 Building {} report ({} → {}, {}) over {} work items",
        kind,
        start,
        end,
        granularity,
        dataset.work_items.len()
    );

    let request = ChartRequest::new(start, end, granularity, Utc::now());
    let chart = build_report(kind, &dataset, &config, &request)?;

    println!("{}", serde_json::to_string_pretty(&chart)?);

    Ok(())
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid date (expected YYYY-MM-DD): {}", value))
}
