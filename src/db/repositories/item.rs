use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::entities::items;

pub struct ItemRepository {
    conn: DatabaseConnection,
}

impl ItemRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<items::Model>> {
        items::Entity::find()
            .all(&self.conn)
            .await
            .context("Failed to list items")
    }

    /// No uniqueness check: the catalog tolerates duplicate names.
    pub async fn create(&self, name: String, category: String) -> Result<items::Model> {
        items::ActiveModel {
            name: Set(name),
            category: Set(category),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert item")
    }
}
