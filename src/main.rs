use std::env;
use std::error::Error;

use leave_ledger::api::{create_router, AppState};
use leave_ledger::config::{ConfigLoader, LedgerConfig};
use leave_ledger::store::open_ledger;
use tokio::net::TcpListener;
use tracing::info;

/// Loads configuration from the first argument, else `LEDGER_CONFIG`, else
/// built-in defaults. Environment overrides apply in every case.
fn load_config() -> Result<LedgerConfig, Box<dyn Error>> {
    let path = env::args().nth(1).or_else(|| env::var("LEDGER_CONFIG").ok());
    let loader = match path {
        Some(path) => {
            info!(path = %path, "Loading configuration");
            ConfigLoader::load(&path)?
        }
        None => ConfigLoader::default(),
    };
    Ok(loader.with_env().into_config())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    let config = load_config()?;
    let ledger = open_ledger(&config)?;
    let state = AppState::new(ledger);

    let listener = TcpListener::bind(&config.server.bind).await?;
    info!(address = %listener.local_addr()?, "Leave ledger listening");

    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
