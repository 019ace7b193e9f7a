//! Web layer module
//!
//! A deliberately small axum application: `/metrics` renders whatever the
//! metrics sink last recorded and `/health` answers liveness probes. Nothing
//! here talks to the modem; scrapes never trigger a poll.

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use std::net::{IpAddr, SocketAddr};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::{config::WebConfig, metrics::ExporterMetrics};

pub mod handlers;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub metrics: ExporterMetrics,
}

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(config: &WebConfig, metrics: ExporterMetrics) -> Result<Self> {
        let ip: IpAddr = config
            .host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse()
            .with_context(|| format!("web.host '{}' is not an IP address", config.host))?;
        let addr = SocketAddr::new(ip, config.port);
        let app = Self::create_router(AppState { metrics });

        Ok(Self { app, addr })
    }

    pub fn create_router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(handlers::health::health_check))
            .route("/metrics", get(handlers::metrics::prometheus_metrics))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Serve until SIGINT/SIGTERM, reporting bind success or failure on `ready_signal`
    pub async fn serve_with_signal(
        self,
        ready_signal: tokio::sync::oneshot::Sender<Result<()>>,
    ) -> Result<()> {
        match tokio::net::TcpListener::bind(&self.addr).await {
            Ok(listener) => {
                let _ = ready_signal.send(Ok(()));

                axum::serve(listener, self.app)
                    .with_graceful_shutdown(shutdown_signal())
                    .await?;
                info!("Web server stopped");
                Ok(())
            }
            Err(bind_error) => {
                let bind_err_msg = format!("Failed to bind to {}: {}", self.addr, bind_error);
                let _ = ready_signal.send(Err(anyhow::anyhow!("{}", bind_err_msg)));
                Err(anyhow::anyhow!("{}", bind_err_msg))
            }
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, shutting down gracefully");
                    }
                    _ = sigint.recv() => {
                        info!("Received SIGINT (Ctrl+C), shutting down gracefully");
                    }
                }
                return;
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!("Failed to install unix signal handlers ({}), falling back to Ctrl+C", e);
            }
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, shutting down gracefully");
}
