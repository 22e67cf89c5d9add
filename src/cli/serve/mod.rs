//! Serve command - runs the HTTP API

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

use crate::api::{create_router, AppState};
use crate::config::AppConfig;
use crate::infrastructure::auth::{JwtConfig, JwtService};
use crate::infrastructure::cache::CacheFactory;
use crate::infrastructure::observability::init_metrics;
use crate::infrastructure::services::CachePolicy;
use crate::infrastructure::storage::StoreFactory;
use crate::infrastructure::user::Argon2Hasher;

/// Run the API server until Ctrl+C or SIGTERM
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    if config.auth.uses_default_secret() {
        warn!("auth.jwt_secret is the development default; set APP__AUTH__JWT_SECRET");
    }

    let state = create_app_state(&config).await?;
    let app = create_router(state, &config.metrics.path);

    let addr = build_socket_addr(&config)?;
    info!("Starting API server on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server shutdown complete");

    Ok(())
}

/// Wires stores, cache and auth into the shared state
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let stores = StoreFactory::create(&config.database).await?;
    let cache = CacheFactory::create(&config.cache).await?;
    let policy = CachePolicy::from_config(&config.cache, &config.database);
    let jwt = JwtService::new(JwtConfig::from(&config.auth));

    info!(
        database = ?config.database.backend,
        cache = ?config.cache.backend,
        ttl_secs = policy.ttl.as_secs(),
        "Application state ready"
    );

    Ok(AppState::new(
        stores,
        cache,
        Arc::new(Argon2Hasher::new()),
        Arc::new(jwt),
        policy,
    )
    .with_metrics(init_metrics(&config.metrics)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CacheBackend, DatabaseBackend};

    #[test]
    fn test_build_socket_addr() {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 3000;

        let addr = build_socket_addr(&config).unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:3000");

        config.server.host = "not-an-ip".to_string();
        assert!(build_socket_addr(&config).is_err());
    }

    #[tokio::test]
    async fn test_create_app_state_in_memory() {
        let mut config = AppConfig::default();
        config.database.backend = DatabaseBackend::InMemory;
        config.cache.backend = CacheBackend::InMemory;
        config.metrics.enabled = false;

        let state = create_app_state(&config).await.unwrap();

        assert!(state.metrics.is_none());
        assert!(state.stores.ping().await.is_ok());
        assert!(state.cache.ping().await.is_ok());
    }
}
