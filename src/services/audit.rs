use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use tracing::warn;

/// Write-only trail of administrative actions, one dated file per day.
///
/// Entries never fail the request that produced them: a failed append is
/// logged and dropped.
#[derive(Clone)]
pub struct AuditLog {
    dir: PathBuf,
    enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditStatus {
    Success,
    Failure,
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

impl AuditLog {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, enabled: bool) -> Self {
        Self {
            dir: dir.into(),
            enabled,
        }
    }

    /// Appends `action | username | status | detail` under a timestamp
    /// prefix to today's file.
    pub fn record(&self, action: &str, username: &str, status: AuditStatus, detail: Option<&str>) {
        if !self.enabled {
            return;
        }

        if let Err(e) = self.append(action, username, status, detail) {
            warn!(error = %e, action, username, "Failed to append audit entry");
        }
    }

    fn append(
        &self,
        action: &str,
        username: &str,
        status: AuditStatus,
        detail: Option<&str>,
    ) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        let now = chrono::Local::now();
        let path = self.dir.join(format!("{}.log", now.format("%Y-%m-%d")));

        let mut entry = format!(
            "[{}] [INFO] {} | {} | {}",
            now.format("%Y-%m-%d %H:%M:%S"),
            action,
            username,
            status
        );
        if let Some(detail) = detail {
            entry.push_str(" | ");
            entry.push_str(detail);
        }
        entry.push('\n');

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        file.write_all(entry.as_bytes())
    }
}
