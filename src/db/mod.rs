use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::{activities, items};
use crate::models::ActivityStatus;

pub mod migrator;
pub mod repositories;

pub use repositories::user::{MigrateCandidate, NewUser, User, UserPatch};
pub use repositories::activity::NewActivity;

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

        // Pooled connections to an in-memory database would each get their
        // own empty database, so force a single connection there.
        let in_memory = db_url.contains(":memory:");
        let max_connections = if in_memory { 1 } else { max_connections };
        let min_connections = if in_memory { 1 } else { min_connections };

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

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
            "Database connected & migrations applied (pool: {}-{})",
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

    fn item_repo(&self) -> repositories::item::ItemRepository {
        repositories::item::ItemRepository::new(self.conn.clone())
    }

    fn activity_repo(&self) -> repositories::activity::ActivityRepository {
        repositories::activity::ActivityRepository::new(self.conn.clone())
    }

    // --- User directory ---

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list().await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn create_user(&self, new: NewUser) -> Result<User> {
        self.user_repo().create(new).await
    }

    pub async fn update_user(&self, id: i32, patch: UserPatch) -> Result<Option<User>> {
        self.user_repo().update(id, patch).await
    }

    pub async fn delete_user(&self, id: i32) -> Result<bool> {
        self.user_repo().delete(id).await
    }

    pub async fn migrate_users(&self, candidates: Vec<MigrateCandidate>) -> Result<usize> {
        self.user_repo().migrate(candidates).await
    }

    // --- Item catalog ---

    pub async fn list_items(&self) -> Result<Vec<items::Model>> {
        self.item_repo().list().await
    }

    pub async fn create_item(&self, name: String, category: String) -> Result<items::Model> {
        self.item_repo().create(name, category).await
    }

    // --- Activity ledger ---

    pub async fn list_activities(&self) -> Result<Vec<activities::Model>> {
        self.activity_repo().list().await
    }

    pub async fn create_activity(&self, new: NewActivity) -> Result<activities::Model> {
        self.activity_repo().create(new).await
    }

    pub async fn set_activity_status(
        &self,
        id: i32,
        status: ActivityStatus,
    ) -> Result<Option<activities::Model>> {
        self.activity_repo().set_status(id, status).await
    }
}
