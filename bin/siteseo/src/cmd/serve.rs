//! Serve command - HTTP surface for IndexNow pings

use std::{net::SocketAddr, path::Path};

use color_eyre::eyre::{Result, WrapErr};
use siteseo_core::Config;
use siteseo_indexnow::Notifier;
use tokio::net::TcpListener;

use crate::server::{AppState, create_router};

/// Run the serve command.
///
/// Listens on `port` until interrupted.
pub async fn run(config_path: &Path, output: &Path, port: u16) -> Result<()> {
    tracing::info!(?config_path, ?output, port, "Starting IndexNow server");

    let config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
    let notifier = Notifier::new(config).wrap_err("Failed to create IndexNow client")?;

    let app = create_router(AppState::new(notifier, output));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind to {addr}"))?;

    println!();
    println!("  IndexNow API running at http://{addr}/api/indexnow");
    println!("  Press Ctrl+C to stop");
    println!();

    axum::serve(listener, app).await.wrap_err("Server error")?;

    Ok(())
}
