use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logs::LogError;

/// Severity bands over the numeric rule level carried by each alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    All,
    Low,
    Medium,
    High,
}

impl Tier {
    #[must_use]
    pub const fn contains(self, level: u32) -> bool {
        match self {
            Self::All => true,
            Self::Low => level < 5,
            Self::Medium => level >= 5 && level < 10,
            Self::High => level >= 10,
        }
    }
}

impl std::str::FromStr for Tier {
    type Err = TierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" | "" => Ok(Self::All),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(TierParseError {
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown alert level '{value}', expected one of: all, low, medium, high")]
pub struct TierParseError {
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertRule {
    #[serde(default, deserialize_with = "lenient_level")]
    pub level: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

/// Producers are not consistent about the level field: floats and numeric
/// strings occur in the wild. Anything non-numeric or negative reads as
/// zero rather than dropping the whole record.
fn lenient_level<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce_level(&value))
}

fn coerce_level(value: &serde_json::Value) -> u32 {
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() && n > 0.0 {
        n.min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertAgent {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
}

/// One decoded alert. The typed fields drive display and tiering; the raw
/// document is retained so substring search sees every field the producer
/// wrote, including ones this struct does not model.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub timestamp: Option<String>,
    pub rule: AlertRule,
    pub agent: AlertAgent,
    pub full_log: Option<String>,
    #[serde(skip)]
    raw: serde_json::Value,
}

impl Alert {
    fn from_value(raw: serde_json::Value) -> Option<Self> {
        if !raw.is_object() {
            return None;
        }

        let decoded: DecodedAlert = serde_json::from_value(raw.clone()).ok()?;
        Some(Self {
            timestamp: decoded.timestamp,
            rule: decoded.rule,
            agent: decoded.agent,
            full_log: decoded.full_log,
            raw,
        })
    }

    /// A missing or non-numeric level reads as zero, the lowest tier.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.rule.level
    }

    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.raw
            .to_string()
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }
}

#[derive(Deserialize)]
struct DecodedAlert {
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    rule: AlertRule,
    #[serde(default)]
    agent: AlertAgent,
    #[serde(default)]
    full_log: Option<String>,
}

#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct AlertSummary {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug)]
pub struct AlertFeed {
    pub alerts: Vec<Alert>,
    /// Lines in the scanned window that failed to decode as JSON objects.
    pub skipped: usize,
}

/// Reads a JSON-lines alert export, newest entries first. Malformed lines
/// are skipped and counted rather than failing the whole feed; export
/// tools get interrupted mid-write and a torn trailing line is routine.
#[derive(Clone)]
pub struct AlertFeedReader {
    read_timeout: Duration,
}

impl AlertFeedReader {
    #[must_use]
    pub const fn new(read_timeout: Duration) -> Self {
        Self { read_timeout }
    }

    /// Bounded like the text log reads; a stalled export (FIFO, hung
    /// mount) surfaces as `Timeout` instead of wedging the request.
    pub async fn load(
        &self,
        path: impl AsRef<Path>,
        max_alerts: usize,
    ) -> Result<AlertFeed, LogError> {
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

        let mut alerts = Vec::new();
        let mut skipped = 0;

        for line in content.lines().rev() {
            if alerts.len() >= max_alerts {
                break;
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match serde_json::from_str::<serde_json::Value>(trimmed)
                .ok()
                .and_then(Alert::from_value)
            {
                Some(alert) => alerts.push(alert),
                None => skipped += 1,
            }
        }

        Ok(AlertFeed { alerts, skipped })
    }

    #[must_use]
    pub fn filter(alerts: Vec<Alert>, tier: Tier, needle: &str) -> Vec<Alert> {
        alerts
            .into_iter()
            .filter(|a| tier.contains(a.level()) && a.matches(needle))
            .collect()
    }

    #[must_use]
    pub fn summarize(alerts: &[Alert]) -> AlertSummary {
        let mut summary = AlertSummary {
            total: alerts.len(),
            ..AlertSummary::default()
        };

        for alert in alerts {
            if Tier::High.contains(alert.level()) {
                summary.high += 1;
            } else if Tier::Medium.contains(alert.level()) {
                summary.medium += 1;
            } else {
                summary.low += 1;
            }
        }

        summary
    }
}
