//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the intake REST API server on its own.
//!
//! ## Intended use
//! Useful for development and debugging when you only want the REST server
//! (with OpenAPI/Swagger UI). Deployments normally use the workspace's
//! main `intake-run` binary.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use intake_core::{gated_products_from_env_value, CoreConfig, DEFAULT_DATA_DIR};

/// Main entry point for the intake REST API server.
///
/// Starts the REST server on the configured address (default:
/// 0.0.0.0:3000) with OpenAPI/Swagger documentation mounted at
/// `/swagger-ui`.
///
/// # Environment Variables
/// - `INTAKE_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `INTAKE_DATA_DIR`: Directory for assessment storage (default: "intake_data")
/// - `INTAKE_GATED_PRODUCTS`: Comma-separated gated product codes (default: "mounjaro")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the data directory does not exist,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("INTAKE_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!("-- Starting intake REST API on {}", addr);

    let data_dir = std::env::var("INTAKE_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.into());
    let data_path = Path::new(&data_dir);
    if !data_path.exists() {
        anyhow::bail!("Intake data directory does not exist: {}", data_path.display());
    }

    let gated_products =
        gated_products_from_env_value(std::env::var("INTAKE_GATED_PRODUCTS").ok());

    let cfg = Arc::new(CoreConfig::new(
        PathBuf::from(data_path),
        gated_products,
    )?);

    let app = router(AppState::new(cfg));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
