//! Olist dashboard report
//! Run: ./target/release/olist_dashboard --start 2017-01-01 --end 2017-12-31 [--json]

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use olist_dashboard::config::DataPaths;
use olist_dashboard::dashboard::{render, DashboardState, DrillDownSelection};
use olist_dashboard::filter::resolve_range;
use olist_dashboard::loader::Dataset;
use olist_dashboard::report::{render_text, Section};
use std::path::PathBuf;
use tracing::info;

/// Render the Olist e-commerce dashboard in the terminal
#[derive(Parser, Debug)]
#[command(name = "olist_dashboard")]
#[command(about = "Sales, review and purchase-pattern dashboard over the Olist dataset")]
struct Args {
    /// Directory holding the seven Olist CSV files (default: $OLIST_DATA_DIR or data/)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// First purchase date to include (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last purchase date to include (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Drill-down category (default: most frequent)
    #[arg(long)]
    category: Option<String>,

    /// Drill-down customer state (default: first alphabetically)
    #[arg(long)]
    state: Option<String>,

    /// Section to print
    #[arg(long, value_enum, default_value = "all")]
    section: Section,

    /// Print the full dashboard as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let paths = DataPaths::resolve(args.data_dir.as_deref());

    info!("Loading dataset from {:?}", paths.orders.parent());
    let dataset = Dataset::load(&paths)?;
    info!("Loaded {} order lines", dataset.len());

    let state = DashboardState {
        range: resolve_range(dataset.bounds(), args.start, args.end)?,
        selection: DrillDownSelection {
            category: args.category,
            state: args.state,
        },
    };
    let dashboard = render(&dataset, &state)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
    } else {
        print!("{}", render_text(&dashboard, args.section));
    }

    Ok(())
}
