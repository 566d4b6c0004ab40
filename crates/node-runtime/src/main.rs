//! # Photo-Feed Node
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging (`pf-telemetry`)
//! 2. Load configuration from the environment
//! 3. Open the Post Store and build the gateway
//! 4. Serve until Ctrl+C, then shut down gracefully

use anyhow::{Context, Result};
use node_runtime::{load_config, NodeRuntime};
use pf_telemetry::{init_telemetry, TelemetryConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry(&TelemetryConfig::from_env()).context("initializing telemetry")?;

    let config = load_config();
    let runtime = NodeRuntime::new(config)?;

    info!("Node is running. Press Ctrl+C to stop.");
    runtime
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Initiating graceful shutdown...");
        })
        .await?;

    info!("Shutdown complete");
    Ok(())
}
