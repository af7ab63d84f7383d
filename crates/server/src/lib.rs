//! Planforge server library.
//!
//! Provides a reusable server function to serve Planforge either for the binary, or for the integration tests.

#![deny(missing_docs)]

mod cors;
mod health;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::anyhow;
use auth::AuthClient;
use axum::{Router, routing::get};
use axum_server::tls_rustls::RustlsConfig;
use config::Config;
use storage::PostgresPlanStore;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

/// Configuration for serving Planforge.
pub struct ServeConfig {
    /// The socket address (IP and port) the server will bind to
    pub listen_address: SocketAddr,
    /// The deserialized Planforge TOML configuration.
    pub config: Config,
}

/// Starts and runs the Planforge server with the provided configuration.
pub async fn serve(ServeConfig { listen_address, config }: ServeConfig) -> anyhow::Result<()> {
    let mut app = Router::new();

    let cors = if let Some(cors_config) = &config.server.cors {
        cors::generate(cors_config)
    } else {
        CorsLayer::permissive()
    };

    let mut plans_exposed = false;

    if config.llm.enabled() {
        let auth = Arc::new(AuthClient::new(&config.auth).map_err(|e| anyhow!("Failed to initialize auth client: {e}"))?);

        // The pool connects lazily; a database that is down at startup only
        // fails individual inserts, not the server.
        let store = Arc::new(
            PostgresPlanStore::connect(&config.database).map_err(|e| anyhow!("Failed to initialize plan store: {e}"))?,
        );

        match llm::router(config.llm.clone(), store, auth).await {
            Ok(llm_router) => {
                app = app.merge(llm_router.layer(cors.clone()));
                plans_exposed = true;
            }
            Err(e) => {
                log::error!("Failed to initialize plan generation router: {e}");
            }
        }
    } else {
        log::debug!("Plan generation is disabled - the endpoint will not be exposed");
    }

    // Health endpoint is added after the functional routes so it stays
    // outside their middleware.
    if config.server.health.enabled {
        if let Some(listen) = config.server.health.listen {
            tokio::spawn(health::bind_health_endpoint(
                listen,
                config.server.tls.clone(),
                config.server.health.clone(),
            ));
        } else {
            let health_router = Router::new()
                .route(&config.server.health.path, get(health::health))
                .layer(cors.clone());

            app = app.merge(health_router);
        }
    }

    let listener = TcpListener::bind(listen_address)
        .await
        .map_err(|e| anyhow!("Failed to bind to {listen_address}: {e}"))?;

    if !plans_exposed {
        log::warn!(
            "Server starting without the plan generation endpoint. \
            Enable [llm] and configure the Google provider to expose it."
        );
    }

    match &config.server.tls {
        Some(tls_config) => {
            let rustls_config = RustlsConfig::from_pem_file(&tls_config.certificate, &tls_config.key)
                .await
                .map_err(|e| anyhow!("Failed to load TLS certificate and key: {e}"))?;

            if plans_exposed {
                log::info!(
                    "Plan generation endpoint available at: https://{listen_address}{}/plans",
                    config.llm.path
                );
            }

            axum_server::from_tcp_rustls(listener.into_std()?, rustls_config)
                .serve(app.into_make_service())
                .await
                .map_err(|e| anyhow!("Failed to start HTTPS server: {e}"))?;
        }
        None => {
            if plans_exposed {
                log::info!(
                    "Plan generation endpoint available at: http://{listen_address}{}/plans",
                    config.llm.path
                );
            }

            axum::serve(listener, app)
                .await
                .map_err(|e| anyhow!("Failed to start HTTP server: {}", e))?;
        }
    }

    Ok(())
}
