mod api;
mod cache;
mod middleware;

use std::{sync::Arc, time::Duration};

use pricebyte_upstream::UpstreamClient;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    cache::SearchCache,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = pricebyte_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let upstream = UpstreamClient::from_config(&config)?;
    let search_cache = SearchCache::new(
        config.search_cache_max_entries,
        Duration::from_secs(config.search_cache_ttl_secs),
    );
    let app = build_app(AppState {
        upstream: Arc::new(upstream),
        search_cache,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        env = %config.env,
        bind_addr = %config.bind_addr,
        upstream = %config.external_api_url,
        "pricebyte server listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
