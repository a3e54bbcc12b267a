//! State and health endpoints.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use simdash_core::StateSnapshot;

use crate::server::GatewayState;

/// Handler for `GET /api/state`: same payload as the viewers' `init` event.
pub async fn get_state(State(state): State<GatewayState>) -> Json<StateSnapshot> {
    Json(state.dashboard.snapshot().await)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: String,
    pub uptime_seconds: u64,
    pub viewers: usize,
    pub total_count: u64,
    pub timestamp: DateTime<Utc>,
}

/// Handler for `GET /api/health`
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthReport> {
    let stats = state.dashboard.stats().await;
    Json(HealthReport {
        status: "ok".into(),
        uptime_seconds: stats.uptime_seconds,
        viewers: stats.viewers,
        total_count: stats.total_count,
        timestamp: Utc::now(),
    })
}
