use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub store: StoreConfig,

    pub directory: DirectoryConfig,

    pub logs: LogsConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            worker_threads: 2,
        }
    }
}

/// Connection settings for the RADIUS credential database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub host: String,

    pub port: u16,

    pub database: String,

    pub username: String,

    pub password: String,

    /// Full connection URL; when set it takes precedence over the
    /// host/port/database fields. Tests use `sqlite::memory:`.
    pub url: Option<String>,

    /// Maximum database connections (default: 5)
    pub max_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            database: "radius".to_string(),
            username: "radius_app".to_string(),
            password: "change-me".to_string(),
            url: None,
            max_connections: 5,
            min_connections: 1,
        }
    }
}

impl StoreConfig {
    /// Connection URL, honoring the explicit override first.
    #[must_use]
    pub fn connection_url(&self) -> String {
        self.url.clone().unwrap_or_else(|| {
            format!(
                "mysql://{}:{}@{}:{}/{}",
                self.username, self.password, self.host, self.port, self.database
            )
        })
    }
}

/// Validation rules and listing defaults for the user directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Minimum password length (default: 8)
    pub min_password_length: usize,

    /// Regex a username must match; RADIUS accounts are provisioned as
    /// member email addresses.
    pub email_pattern: String,

    /// Group assigned when the create request names none.
    pub default_group: String,

    /// Page size for the user listing (default: 50)
    pub page_size: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            min_password_length: 8,
            email_pattern: r"^[a-zA-Z0-9._%+-]+@gym\.fr$".to_string(),
            default_group: "staff".to_string(),
            page_size: 50,
        }
    }
}

/// Paths and window sizes for the read-only log views, plus the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogsConfig {
    pub auth_log_path: String,

    pub system_log_path: String,

    pub alert_export_path: String,

    /// Tail window for text log views (default: 100 lines)
    pub tail_lines: usize,

    /// Maximum decoded alerts per request (default: 100)
    pub alert_limit: usize,

    /// Upper bound on a single whole-file read (default: 10 seconds)
    pub read_timeout_seconds: u64,

    /// Directory for the dated audit log files.
    pub audit_dir: String,

    pub audit_enabled: bool,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            auth_log_path: "/var/log/freeradius/radius.log".to_string(),
            system_log_path: "/var/log/syslog".to_string(),
            alert_export_path: "/var/log/wazuh-export/alerts.json".to_string(),
            tail_lines: 100,
            alert_limit: 100,
            read_timeout_seconds: 10,
            audit_dir: "/var/log/radman".to_string(),
            audit_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub enabled: bool,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 6812,
            cors_allowed_origins: vec![
                "http://localhost:6812".to_string(),
                "http://127.0.0.1:6812".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            store: StoreConfig::default(),
            directory: DirectoryConfig::default(),
            logs: LogsConfig::default(),
            server: ServerConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("radman").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".radman").join("config.toml"));
        }

        paths
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = PathBuf::from("config.toml");
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.directory.min_password_length == 0 {
            anyhow::bail!("Minimum password length must be > 0");
        }

        regex::Regex::new(&self.directory.email_pattern)
            .with_context(|| format!("Invalid email pattern: {}", self.directory.email_pattern))?;

        if self.directory.page_size == 0 {
            anyhow::bail!("Listing page size must be > 0");
        }

        if self.store.url.is_none() && self.store.host.is_empty() {
            anyhow::bail!("Store host cannot be empty");
        }

        Ok(())
    }
}
