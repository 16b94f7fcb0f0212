use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, LogLineDto, LogViewResponse};
use crate::services::{LogError, LogReader};

#[derive(Debug, Deserialize)]
pub struct LogQuery {
    pub lines: Option<usize>,
    #[serde(default)]
    pub search: Option<String>,
}

/// `GET /api/logs/{source}?lines=&search=`
///
/// Tails the selected log, most recent lines first. A missing source file
/// returns an empty, unavailable view rather than an error; the collector
/// may simply not have started yet.
pub async fn get_logs(
    State(state): State<Arc<AppState>>,
    Path(source): Path<String>,
    Query(query): Query<LogQuery>,
) -> Result<Json<ApiResponse<LogViewResponse>>, ApiError> {
    let logs_config = &state.config().logs;

    let path = match source.as_str() {
        "auth" => logs_config.auth_log_path.clone(),
        "system" => logs_config.system_log_path.clone(),
        other => {
            return Err(ApiError::validation(format!(
                "Unknown log source '{}', expected 'auth' or 'system'",
                other
            )));
        }
    };

    let window = query
        .lines
        .unwrap_or(logs_config.tail_lines)
        .min(logs_config.tail_lines);

    let tail = match state.log_reader().read_tail(&path, window).await {
        Ok(lines) => lines,
        Err(LogError::SourceUnavailable { path }) => {
            return Ok(Json(ApiResponse::success(LogViewResponse {
                available: false,
                lines: Vec::new(),
                summary: crate::services::LogSummary::default(),
                advisory: Some(format!("Log file not found: {}", path)),
            })));
        }
        Err(err) => return Err(err.into()),
    };

    // Counts cover the whole tail window; the search filter narrows the
    // lines shown but not the figures beside them.
    let summary = LogReader::summarize(tail.iter().map(String::as_str));

    let needle = query.search.unwrap_or_default();
    let lines = tail
        .into_iter()
        .filter(|line| LogReader::matches(line, &needle))
        .map(|text| {
            let class = LogReader::classify(&text);
            LogLineDto { text, class }
        })
        .collect();

    Ok(Json(ApiResponse::success(LogViewResponse {
        available: true,
        lines,
        summary,
        advisory: None,
    })))
}
