//! Web layer module
//!
//! The HTTP interface for Shutterlink. Handlers are thin and delegate to
//! [`ImageShareService`]; error mapping to status codes lives in
//! [`responses`].
//!
//! CORS is permissive because the upload frontend may be served from a
//! different origin than the API.

use anyhow::Result;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;

use crate::{config::Config, services::ImageShareService};

pub mod handlers;
pub mod responses;

pub use responses::{ErrorResponse, handle_error};

/// Slack on top of the configured upload limit for multipart framing, so a
/// payload just over the limit reaches validation and gets the proper
/// "too large" message instead of a bare 413.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub image_service: ImageShareService,
}

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    /// Create a new web server serving the given image share service.
    pub fn new(config: &Config, image_service: ImageShareService) -> Result<Self> {
        let app = create_router(
            AppState { image_service },
            config.uploads.max_file_size_bytes(),
        );
        let addr: SocketAddr = format!("{}:{}", config.web.host, config.web.port).parse()?;

        Ok(Self { app, addr })
    }

    /// Serve until SIGTERM or SIGINT, then shut down gracefully.
    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;

        let shutdown_signal = async {
            #[cfg(unix)]
            {
                use tokio::signal::unix::{SignalKind, signal};
                let mut sigterm =
                    signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
                let mut sigint =
                    signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");

                tokio::select! {
                    _ = sigterm.recv() => {
                        tracing::info!("Received SIGTERM, shutting down gracefully");
                    }
                    _ = sigint.recv() => {
                        tracing::info!("Received SIGINT (Ctrl+C), shutting down gracefully");
                    }
                }
            }

            #[cfg(not(unix))]
            {
                tokio::signal::ctrl_c()
                    .await
                    .expect("failed to install Ctrl+C handler");
                tracing::info!("Received Ctrl+C, shutting down gracefully");
            }
        };

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal)
            .await?;
        Ok(())
    }

    /// Get the host address
    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    /// Get the port number
    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

/// Create the router with all routes and middleware.
///
/// Public so integration tests can drive the real router without binding a
/// socket.
pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/upload", post(handlers::upload_image))
        .route("/api/preview", post(handlers::preview_image))
        .route("/image/{id}", get(handlers::serve_image))
        // Middleware (applied in reverse order)
        .layer(DefaultBodyLimit::max(max_upload_bytes + MULTIPART_OVERHEAD))
        .layer(CorsLayer::permissive())
        // Shared state
        .with_state(state)
}
