use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{AlertFeedResponse, ApiError, ApiResponse, AppState};
use crate::services::{AlertFeedReader, AlertSummary, LogError, Tier};

#[derive(Debug, Deserialize)]
pub struct AlertQuery {
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    pub limit: Option<usize>,
}

/// `GET /api/alerts?level=&search=&limit=`
///
/// Newest alerts first from the JSON-lines export. The tier and search
/// filters narrow the working set and the summary describes exactly the
/// alerts returned, so the severity counts always match what is shown.
pub async fn get_alerts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AlertQuery>,
) -> Result<Json<ApiResponse<AlertFeedResponse>>, ApiError> {
    let logs_config = &state.config().logs;

    let tier: Tier = query
        .level
        .as_deref()
        .unwrap_or("all")
        .parse()
        .map_err(|e: crate::services::alerts::TierParseError| ApiError::validation(e.to_string()))?;

    let limit = query
        .limit
        .unwrap_or(logs_config.alert_limit)
        .min(logs_config.alert_limit);

    let feed = match state
        .alert_feed()
        .load(&logs_config.alert_export_path, limit)
        .await
    {
        Ok(feed) => feed,
        Err(LogError::SourceUnavailable { path }) => {
            return Ok(Json(ApiResponse::success(AlertFeedResponse {
                available: false,
                alerts: Vec::new(),
                summary: AlertSummary::default(),
                skipped: 0,
                advisory: Some(format!("Alert export not found: {}", path)),
            })));
        }
        Err(err) => return Err(err.into()),
    };

    let needle = query.search.unwrap_or_default();
    let alerts = AlertFeedReader::filter(feed.alerts, tier, &needle);
    let summary = AlertFeedReader::summarize(&alerts);

    Ok(Json(ApiResponse::success(AlertFeedResponse {
        available: true,
        alerts,
        summary,
        skipped: feed.skipped,
        advisory: None,
    })))
}
