#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Worker dashboard API server binary.

use std::sync::Arc;

use clap::Parser;
use worker_dashboard_gateway::PostgrestGateway;
use worker_dashboard_server::{AppState, run_server};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

#[derive(Parser)]
#[command(name = "worker_dashboard_server", about = "Worker dashboard API server")]
struct Args {
    /// Address to bind (default: `BIND_ADDR` or 127.0.0.1)
    #[arg(long)]
    bind_addr: Option<String>,

    /// Port to listen on (default: `PORT` or 8080)
    #[arg(long)]
    port: Option<u16>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let args = Args::parse();

    let bind_addr = args
        .bind_addr
        .or_else(|| std::env::var("BIND_ADDR").ok())
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
    let port = args.port.unwrap_or_else(|| {
        std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT)
    });

    log::info!("Connecting to store...");
    let gateway = PostgrestGateway::from_env().map_err(|e| {
        log::error!("Failed to configure store: {e}");
        std::io::Error::other(e)
    })?;

    run_server(&bind_addr, port, AppState::new(Arc::new(gateway))).await
}
