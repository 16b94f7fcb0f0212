use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::db::Store;
use crate::services::{AlertFeedReader, AuditLog, LogReader, UserDirectoryService};

/// Everything the HTTP surface and the CLI share. Config is resolved once
/// at startup and read-only from here on; a settings change means a
/// restart, which keeps every request seeing one consistent snapshot.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub directory: Arc<UserDirectoryService>,

    pub log_reader: LogReader,

    pub alert_feed: AlertFeedReader,

    pub audit: AuditLog,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.store.connection_url(),
            config.store.max_connections,
            config.store.min_connections,
        )
        .await?;

        Self::with_store(config, store)
    }

    /// Assembles services around an already-connected store. Split out so
    /// tests can hand in an in-memory database.
    pub fn with_store(config: Config, store: Store) -> anyhow::Result<Self> {
        let audit = AuditLog::new(&config.logs.audit_dir, config.logs.audit_enabled);

        let directory = Arc::new(UserDirectoryService::new(
            store.clone(),
            config.directory.clone(),
            audit.clone(),
        )?);

        let read_timeout = Duration::from_secs(config.logs.read_timeout_seconds);
        let log_reader = LogReader::new(read_timeout);
        let alert_feed = AlertFeedReader::new(read_timeout);

        Ok(Self {
            config: Arc::new(config),
            store,
            directory,
            log_reader,
            alert_feed,
            audit,
        })
    }
}
