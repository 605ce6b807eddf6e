use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router, middleware,
    routing::{get, post},
};

use threadnav_core::config::ServerConfig;
use threadnav_core::{NavigationService, SqliteNavigationStore};

mod dto;
mod error;
mod handlers;
mod security;

#[cfg(test)]
mod tests;

pub(crate) type SharedService = Arc<NavigationService<SqliteNavigationStore>>;

#[derive(Clone)]
pub(crate) struct WebState {
    pub(crate) service: SharedService,
}

impl WebState {
    fn new(service: NavigationService<SqliteNavigationStore>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Start the navigation API server and block until ctrl-c.
///
/// # Errors
/// Returns an error when the runtime cannot be created, the socket cannot be
/// bound, or the server exits with a runtime failure.
pub fn serve_web(
    service: NavigationService<SqliteNavigationStore>,
    config: &ServerConfig,
) -> Result<()> {
    let state = WebState::new(service);
    let router = app_router(state, &config.cors_allowed_origins)?;
    let bind_addr = config.addr.clone();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build web runtime")?;

    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .with_context(|| format!("failed to bind navigation server at {bind_addr}"))?;
        tracing::info!(addr = %listener.local_addr()?, "navigation server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("shutdown signal received");
            })
            .await
            .context("navigation server failed")
    })
}

pub(crate) fn app_router(state: WebState, cors_allowed_origins: &[String]) -> Result<Router> {
    let cors = security::cors_layer(cors_allowed_origins)?;
    Ok(Router::new()
        .route("/health", get(handlers::health))
        .route("/navigator", post(handlers::create_navigator))
        .route("/navigator/{chat_id}", get(handlers::get_navigator))
        .route("/navigator/{chat_id}/entries", post(handlers::add_entry))
        .route("/outline/preview", post(handlers::preview_outline))
        .layer(middleware::from_fn(security::security_headers_middleware))
        .layer(cors)
        .with_state(state))
}
