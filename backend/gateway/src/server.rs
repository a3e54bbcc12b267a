//! Dashboard HTTP server.
//!
//! Route table: landing page, state query, health, screenshot file and the live
//! WebSocket feed.

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::control_ui;
use crate::dashboard::Dashboard;
use crate::screenshot;
use crate::state_api;
use crate::ws_server;

/// Default per-viewer buffer of pending messages before the viewer is dropped.
pub const DEFAULT_VIEWER_BUFFER: usize = 256;

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub dashboard: Dashboard,
    /// Messages a viewer may fall behind by before it is disconnected. Never zero.
    viewer_buffer: usize,
}

impl GatewayState {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard,
            viewer_buffer: DEFAULT_VIEWER_BUFFER,
        }
    }

    pub fn with_viewer_buffer(mut self, viewer_buffer: usize) -> Self {
        self.viewer_buffer = viewer_buffer.max(1);
        self
    }

    pub fn viewer_buffer(&self) -> usize {
        self.viewer_buffer
    }
}

pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(control_ui::index))
        .route("/api/state", get(state_api::get_state))
        .route("/api/health", get(state_api::get_health))
        .route("/screenshot", get(screenshot::get_screenshot))
        .route("/ws", get(ws_server::ws_handler))
        .with_state(state)
}

/// Serve the dashboard until Ctrl-C.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let app = build_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind dashboard on {addr}"))?;
    info!("Dashboard listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Dashboard server failed")?;

    info!("Dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
