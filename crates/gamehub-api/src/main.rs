//! GameHub API Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p gamehub-api
//! ```
//!
//! Configuration is loaded from environment variables (and `.env` if present).

use gamehub_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "Server failed to start");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    // Initialize tracing
    let tracing_config = TracingConfig::for_environment(config.app.env);
    if let Err(e) = try_init_tracing_with_config(&tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        port = config.api.port,
        backend = ?config.store.backend,
        "Configuration loaded"
    );

    gamehub_api::run(config).await?;

    Ok(())
}
