use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use testdrive::api::{self, AppState};
use testdrive::config::Config;
use testdrive::engine::Engine;
use testdrive::{dataset, observability};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::parse();
    observability::init(config.metrics_port)?;

    let data = dataset::load(&config.dataset)?;
    let engine = Engine::new(data)?;
    observability::record_dataset_size(engine.dealers().len(), engine.bookings().len());

    let addr = config.listen_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!("testdrive listening on {}", listener.local_addr()?);
    info!("  dataset: {}", config.dataset.display());
    info!("  dealers: {}, bookings: {}", engine.dealers().len(), engine.bookings().len());
    info!("  persist: {}", if config.persist { "enabled" } else { "disabled" });
    info!(
        "  metrics: {}",
        config
            .metrics_port
            .map_or("disabled".to_string(), |p| format!("http://0.0.0.0:{p}/metrics"))
    );

    let state = Arc::new(AppState::new(engine, config.persist_path()));
    api::serve(listener, state, shutdown_signal()).await?;

    info!("testdrive stopped");
    Ok(())
}

/// Resolves on ctrl-c or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!("failed to register SIGTERM handler: {e}");
                ctrl_c.await.ok();
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
    }
    info!("shutdown signal received, draining requests");
}
