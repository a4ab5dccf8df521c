//! HTTP front end: renders countdowns on request and serves the GIFs.

pub mod config;
pub mod error;
pub mod logger;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::foundation::error::{CountdownError, CountdownResult};
use crate::text::fonts::FontLibrary;

use self::config::ServiceConfig;
use self::routes::{AppState, routes};

/// Load fonts, bind the port and serve until Ctrl-C.
pub async fn run(config: ServiceConfig) -> CountdownResult<()> {
    tracing::info!(?config, "starting countdown service");

    let fonts_opts = config.fonts.clone();
    let fonts = tokio::task::spawn_blocking(move || FontLibrary::load(&fonts_opts))
        .await
        .map_err(|err| CountdownError::Other(err.into()))??;

    let state = AppState {
        fonts: Arc::new(fonts),
        scratch_dir: Arc::new(config.scratch_dir.clone()),
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| CountdownError::Other(anyhow::Error::new(err).context(format!("bind {addr}"))))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, routes(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| CountdownError::Other(err.into()))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
