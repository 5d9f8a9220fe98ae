mod api;
mod middleware;

use std::sync::Arc;

use rxp_db::PgCollaborators;
use rxp_pricing::{default_providers, LiveQuoteProvider, PriceSearch};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::RateLimitState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(rxp_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(bind_addr = %config.bind_addr, "starting rxp-server");

    let pool_config = rxp_db::PoolConfig::from_app_config(&config);
    let pool = rxp_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = rxp_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations up to date");

    let live = LiveQuoteProvider::from_config(&config)?.map(Arc::new);
    if live.is_some() {
        tracing::info!("live goodrx quotes enabled");
    }

    let pg = Arc::new(PgCollaborators::new(pool.clone()));
    let search = PriceSearch::new(
        pg.clone(),
        pg.clone(),
        pg,
        default_providers(live.clone()),
    );

    let app = build_app(
        AppState { pool, search, live },
        RateLimitState::per_minute(config.rate_limit_per_minute),
    );

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
