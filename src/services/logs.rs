use std::path::Path;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("Log file not found: {path}")]
    SourceUnavailable { path: String },

    #[error("Timed out reading log file: {path}")]
    Timeout { path: String },

    #[error("Failed to read log file: {0}")]
    Io(#[from] std::io::Error),
}

/// Classification of one authentication log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogClass {
    Success,
    Failure,
    Info,
}

#[derive(Debug, Default, Clone, Copy, serde::Serialize)]
pub struct LogSummary {
    pub total: usize,
    pub success: usize,
    pub failure: usize,
}

const SUCCESS_MARKERS: [&str; 2] = ["access-accept", "login ok"];
const FAILURE_MARKERS: [&str; 2] = ["access-reject", "login incorrect"];

/// Bounded, classified views over append-only text logs. Stateless: every
/// call re-reads the file, so a repeated request observes appended lines.
#[derive(Clone)]
pub struct LogReader {
    read_timeout: Duration,
}

impl LogReader {
    #[must_use]
    pub const fn new(read_timeout: Duration) -> Self {
        Self { read_timeout }
    }

    /// Last `max_lines` lines of the file, most recent first. A missing
    /// file is an expected condition (the producer may not be running yet)
    /// and gets its own error variant so callers can render an advisory.
    pub async fn read_tail(
        &self,
        path: impl AsRef<Path>,
        max_lines: usize,
    ) -> Result<Vec<String>, LogError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(LogError::SourceUnavailable {
                path: path.display().to_string(),
            });
        }

        let content = tokio::time::timeout(self.read_timeout, tokio::fs::read_to_string(path))
            .await
            .map_err(|_| LogError::Timeout {
                path: path.display().to_string(),
            })??;

        let mut tail: Vec<String> = content
            .lines()
            .rev()
            .take(max_lines)
            .map(str::to_string)
            .collect();
        tail.shrink_to_fit();
        Ok(tail)
    }

    /// Total and deterministic: marker substrings, case-insensitive,
    /// anything unrecognized is Info.
    #[must_use]
    pub fn classify(line: &str) -> LogClass {
        let lower = line.to_lowercase();

        if SUCCESS_MARKERS.iter().any(|m| lower.contains(m)) {
            LogClass::Success
        } else if FAILURE_MARKERS.iter().any(|m| lower.contains(m)) {
            LogClass::Failure
        } else {
            LogClass::Info
        }
    }

    /// Case-insensitive containment predicate over the line text,
    /// independent of classification.
    #[must_use]
    pub fn matches(line: &str, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        line.to_lowercase().contains(&needle.to_lowercase())
    }

    /// Success/failure counts over the given window. Computed over the
    /// same lines the caller displays, so the figures and the view agree.
    #[must_use]
    pub fn summarize<'a>(lines: impl IntoIterator<Item = &'a str>) -> LogSummary {
        let mut summary = LogSummary::default();

        for line in lines {
            summary.total += 1;
            match Self::classify(line) {
                LogClass::Success => summary.success += 1,
                LogClass::Failure => summary.failure += 1,
                LogClass::Info => {}
            }
        }

        summary
    }
}
