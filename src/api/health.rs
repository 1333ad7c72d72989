use crate::store::Probe;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

#[derive(Clone)]
pub struct HealthState {
    pub probe: Arc<dyn Probe>,
    pub start_time: Instant,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    store_connected: bool,
    uptime_seconds: u64,
}

pub async fn health_check(State(state): State<HealthState>) -> Json<HealthResponse> {
    let store_connected = match state.probe.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!("Health check could not reach store: {}", e);
            false
        }
    };

    Json(HealthResponse {
        status: if store_connected {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        store_connected,
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}
