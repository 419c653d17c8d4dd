//! Synthetic data generator for the Olist dashboard
//!
//! Writes all seven Olist CSV files with controlled random variation, so the
//! dashboard and API can run without the Kaggle download.
//!
//! Usage:
//!   cargo run --release --bin generate_synthetic -- [OPTIONS]
//!
//! Options:
//!   --orders <N>         Number of orders (default: 2000)
//!   --products <N>       Size of the product catalogue (default: 300)
//!   --start <DATE>       First purchase day (default: 2017-01-01)
//!   --days <N>           Days covered by purchases (default: 365)
//!   --repeat-rate <F>    Probability of a returning customer (default: 0.08)
//!   --late-rate <F>      Probability of a late delivery (default: 0.10)
//!   --seed <N>           Random seed for reproducibility (optional)
//!   --output <PATH>      Output directory (default: data)

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use olist_dashboard::synthetic::{generate, write_tables, SyntheticOptions};
use std::path::PathBuf;
use tracing::info;

/// Synthetic data generator for the Olist dataset
#[derive(Parser, Debug)]
#[command(name = "generate_synthetic")]
#[command(about = "Generate a synthetic Olist-shaped dataset")]
struct Args {
    /// Number of orders to generate
    #[arg(long, default_value = "2000")]
    orders: usize,

    /// Number of distinct products
    #[arg(long, default_value = "300")]
    products: usize,

    /// First purchase day (YYYY-MM-DD)
    #[arg(long, default_value = "2017-01-01")]
    start: NaiveDate,

    /// Number of days purchases are spread over
    #[arg(long, default_value = "365")]
    days: i64,

    /// Probability an order comes from a returning customer (0.0 - 1.0)
    #[arg(long, default_value = "0.08")]
    repeat_rate: f64,

    /// Probability an order is delivered after its estimate (0.0 - 1.0)
    #[arg(long, default_value = "0.10")]
    late_rate: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory for the seven CSV files
    #[arg(long, default_value = "data")]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    for (name, rate) in [("repeat-rate", args.repeat_rate), ("late-rate", args.late_rate)] {
        if !(0.0..=1.0).contains(&rate) {
            anyhow::bail!("--{} must be between 0.0 and 1.0, got {}", name, rate);
        }
    }

    let options = SyntheticOptions {
        orders: args.orders,
        products: args.products,
        start: args.start,
        days: args.days,
        repeat_rate: args.repeat_rate,
        late_rate: args.late_rate,
        seed: args.seed,
        ..Default::default()
    };

    println!("Synthetic Olist Data Generator");
    println!("==============================");
    println!("Orders:      {}", options.orders);
    println!("Products:    {}", options.products);
    println!("Period:      {} + {} days", options.start, options.days);
    println!("Repeat rate: {:.1}%", options.repeat_rate * 100.0);
    println!("Late rate:   {:.1}%", options.late_rate * 100.0);
    if let Some(seed) = options.seed {
        println!("Seed:        {}", seed);
    }
    println!();

    let tables = generate(&options)?;
    let paths = write_tables(&tables, &args.output)?;
    info!("Dataset written to {:?}", args.output);

    println!("Files:");
    for path in paths.all() {
        println!("  {}", path.display());
    }
    println!(
        "\nGenerated {} orders, {} order items, {} payments, {} reviews",
        tables.orders.len(),
        tables.items.len(),
        tables.payments.len(),
        tables.reviews.len()
    );

    Ok(())
}
