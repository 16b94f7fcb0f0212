use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime_seconds: u64,
    pub database: bool,
    pub auth_log: bool,
    pub system_log: bool,
    pub alert_export: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthLiveResponse {
    pub status: &'static str,
}

/// `GET /api/system/status`
///
/// Reachability of the store and presence of each log source, so the
/// console can flag a stopped collector before anyone opens its view.
pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SystemStatus>>, ApiError> {
    let logs_config = &state.config().logs;

    let status = SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        database: state.store().ping().await.is_ok(),
        auth_log: std::path::Path::new(&logs_config.auth_log_path).exists(),
        system_log: std::path::Path::new(&logs_config.system_log_path).exists(),
        alert_export: std::path::Path::new(&logs_config.alert_export_path).exists(),
    };

    Ok(Json(ApiResponse::success(status)))
}

/// `GET /api/system/health/live`
///
/// Lightweight liveness probe to indicate the API process is running.
pub async fn health_live() -> impl IntoResponse {
    Json(ApiResponse::success(HealthLiveResponse { status: "alive" }))
}
