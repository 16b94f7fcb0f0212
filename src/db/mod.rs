use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::user::{InsertOutcome, UserRow};

/// Gateway to the RADIUS credential store. Owns the connection pool and
/// hands out per-call repositories; no other state.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Store connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    pub async fn user_exists(&self, username: &str) -> Result<bool, DbErr> {
        self.user_repo().exists(username).await
    }

    pub async fn insert_user(
        &self,
        username: &str,
        password: &str,
        groupname: &str,
    ) -> Result<InsertOutcome, DbErr> {
        self.user_repo()
            .insert_user(username, password, groupname)
            .await
    }

    pub async fn delete_user(&self, username: &str) -> Result<u64, DbErr> {
        self.user_repo().delete_user(username).await
    }

    pub async fn list_users(&self) -> Result<Vec<UserRow>, DbErr> {
        self.user_repo().list().await
    }

    pub async fn list_users_page(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<UserRow>, u64), DbErr> {
        self.user_repo().list_page(page, page_size).await
    }
}
