use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing_subscriber::EnvFilter;

use formvault::config::Config;
use formvault::storage::{AzureBlobStore, BlobStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env().expect("Failed to load configuration");

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    tracing::info!("Starting Formvault");

    // A broken or absent connection string is not fatal: the site still
    // serves, and each submission answers 500 until storage is fixed.
    let store: Option<Arc<dyn BlobStore>> = match &config.storage {
        Some(storage) => match AzureBlobStore::new(storage) {
            Ok(backend) => {
                tracing::info!(
                    "Blob storage configured for container {}",
                    storage.container
                );
                Some(Arc::new(backend))
            }
            Err(e) => {
                tracing::error!("Storage connection string is unusable: {e}");
                None
            }
        },
        None => {
            tracing::warn!(
                "No storage connection string configured; submissions will be rejected"
            );
            None
        }
    };

    let addr = SocketAddr::new(config.host, config.port);
    let app = formvault::build_app(store, config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
