//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, request logging)
//! - Render unmatched paths and methods as `UNSUPPORTED_PATH`
//! - Bind server to listener and shut down gracefully

use axum::{
    error_handling::HandleErrorLayer,
    middleware,
    routing::{any, get},
    BoxError, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::{timeout::error::Elapsed, timeout::TimeoutLayer, ServiceBuilder};
use tower_http::trace::TraceLayer;

use crate::config::{GatewayConfig, ListenerConfig};
use crate::error::{ErrorKind, TypedError};
use crate::http::handlers;
use crate::http::request::{request_id_middleware, request_logging_middleware, STATUS_PATH};
use crate::service::PersonsManager;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<PersonsManager>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server around an assembled manager.
    pub fn new(config: GatewayConfig, manager: Arc<PersonsManager>) -> Self {
        let state = AppState { manager };
        let router = Self::build_router(&config.listener, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ListenerConfig, state: AppState) -> Router {
        Router::new()
            .route(STATUS_PATH, any(handlers::status))
            .route(
                "/v1/persons/{person_id}",
                get(handlers::get_person).delete(handlers::delete_person),
            )
            .route(
                "/v1/persons/{person_id}/children",
                get(handlers::get_person_children),
            )
            .fallback(handlers::unsupported_path)
            .method_not_allowed_fallback(handlers::unsupported_path)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(HandleErrorLayer::new(handle_middleware_error))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.request_timeout_secs,
                    ))),
            )
            .layer(middleware::from_fn(request_logging_middleware))
            .layer(middleware::from_fn(request_id_middleware))
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for serving on a custom transport or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            service_url = %self.config.persons.service_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Render failures raised by the middleware stack as typed errors.
async fn handle_middleware_error(error: BoxError) -> TypedError {
    if error.is::<Elapsed>() {
        return TypedError::new(ErrorKind::RequestTimeout, 408, "Request timed out");
    }
    tracing::error!(error = %error, "Unhandled middleware error");
    TypedError::new(ErrorKind::InternalError, 500, "Unexpected error")
}
