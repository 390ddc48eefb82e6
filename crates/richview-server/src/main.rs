mod api;
mod middleware;

use std::sync::Arc;

use anyhow::Context;
use richview_catalog::{CatalogClient, FrameProbe};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::RateLimitState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = richview_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(env = %config.env, bind_addr = %config.bind_addr, "starting richview server");

    let stores = richview_core::load_stores(&config.stores_path)
        .with_context(|| format!("loading stores from {}", config.stores_path.display()))?;

    let catalog = if config.paystack_secret_key.is_some() {
        Some(Arc::new(CatalogClient::from_config(&config)?))
    } else {
        tracing::warn!("PAYSTACK_SECRET_KEY not set; catalog routes will answer with errors");
        None
    };
    let frame_probe = FrameProbe::new(config.catalog_timeout_secs, &config.catalog_user_agent)?;

    let state = AppState {
        catalog,
        frame_probe: Arc::new(frame_probe),
        stores: Arc::new(stores),
    };
    let app = build_app(state, RateLimitState::per_minute(config.rate_limit_per_minute));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
