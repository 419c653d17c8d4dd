//! Dashboard REST API Server
//!
//! Usage:
//!   cargo run --release --bin api_server -- [OPTIONS]
//!
//! Options:
//!   --port <PORT>       Port to listen on (default: 8080)
//!   --data-dir <PATH>   Directory with the Olist CSV files

use anyhow::Result;
use clap::Parser;
use olist_dashboard::api::{create_router, DashboardService};
use olist_dashboard::config::DataPaths;
use olist_dashboard::loader::Dataset;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "api_server")]
#[command(about = "Serve the Olist dashboard as JSON over HTTP")]
struct Args {
    /// Port to listen on
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Directory holding the seven Olist CSV files (default: $OLIST_DATA_DIR or data/)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn print_banner(port: u16, dataset: &Dataset) {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              Olist E-Commerce Dashboard API                  ║");
    println!("╠══════════════════════════════════════════════════════════════╣");
    println!("║  REST API:  http://localhost:{:<32}║", port);
    println!("║  Rows:      {:<49}║", dataset.len());
    if let Some(bounds) = dataset.bounds() {
        println!("║  Period:    {:<49}║", format!("{} .. {}", bounds.start, bounds.end));
    }
    println!("╠══════════════════════════════════════════════════════════════╣");
    println!("║  GET /api/v1/health                                          ║");
    println!("║  GET /api/v1/bounds                                          ║");
    println!("║  GET /api/v1/dashboard?start=&end=&category=&state=          ║");
    println!("║  GET /api/v1/drilldown?start=&end=&category=&state=          ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .init();

    let args = Args::parse();
    let paths = DataPaths::resolve(args.data_dir.as_deref());

    // Load failures abort here, before anything is served
    let dataset = Arc::new(Dataset::load(&paths)?);
    print_banner(args.port, &dataset);

    let service = Arc::new(DashboardService::new(dataset));
    let app = create_router(service);

    let addr: SocketAddr = format!("0.0.0.0:{}", args.port).parse()?;
    tracing::info!("Starting REST server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
