mod api;
mod middleware;

use std::sync::Arc;

use eventloc_places::{Geocoder, GoogleMapsClient};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = eventloc_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = eventloc_db::PoolConfig::from_app_config(&config);
    let pool = eventloc_db::connect_pool(&config.database_url, pool_config).await?;
    eventloc_db::run_migrations(&pool).await?;

    let maps = GoogleMapsClient::with_base_url(
        config.google_maps_api_key.clone(),
        config.maps_timeout_secs,
        &config.maps_base_url,
    )?;
    if !maps.has_api_key() {
        tracing::warn!("GOOGLE_MAPS_API_KEY not set; place lookups will fail with 502");
    }
    let geocoder: Arc<dyn Geocoder> = Arc::new(maps);

    let auth = AuthState::from_env(matches!(
        config.env,
        eventloc_core::Environment::Development
    ))?;
    let app = build_app(AppState { pool, geocoder }, auth, default_rate_limit_state());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "eventloc server listening");
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
