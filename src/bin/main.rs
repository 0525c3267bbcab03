use std::net::TcpListener;

use actix_web::web;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bloglist::config::Config;
use bloglist::core::db::seed_demo_data;
use bloglist::core::store::Store;
use bloglist::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init()
    {
        eprintln!("tracing init failed: {}", e);
    }

    let config = Config::parse();
    let store = Store::open_in_memory();

    if config.seed {
        if let Err(e) = seed_demo_data(&store) {
            warn!(error = ?e, "failed to seed demo data");
        }
    }

    let state = web::Data::new(AppState::new(&config, store));
    let listener = TcpListener::bind(config.bind)?;

    info!(addr = %config.bind, "server listening");
    bloglist::run(listener, state)?.await
}
