use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::entities::activities;
use crate::models::ActivityStatus;

/// Fields for a new ledger entry. Free-text fields are stored verbatim.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub date: String,
    pub action: String,
    pub item_category: Option<String>,
    pub recipient: String,
    pub user: String,
    pub comment: Option<String>,
    pub status: ActivityStatus,
}

pub struct ActivityRepository {
    conn: DatabaseConnection,
}

impl ActivityRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<activities::Model>> {
        activities::Entity::find()
            .all(&self.conn)
            .await
            .context("Failed to list activities")
    }

    pub async fn create(&self, new: NewActivity) -> Result<activities::Model> {
        let created_at = chrono::Utc::now().to_rfc3339();

        activities::ActiveModel {
            date: Set(new.date),
            action: Set(new.action),
            item_category: Set(new.item_category),
            recipient: Set(new.recipient),
            user: Set(new.user),
            comment: Set(new.comment),
            status: Set(new.status.as_str().to_string()),
            created_at: Set(created_at),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert activity")
    }

    /// Overwrite the status field, leaving every other field untouched.
    /// Returns `None` when the id does not exist.
    pub async fn set_status(
        &self,
        id: i32,
        status: ActivityStatus,
    ) -> Result<Option<activities::Model>> {
        let Some(activity) = activities::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query activity for status update")?
        else {
            return Ok(None);
        };

        let mut active: activities::ActiveModel = activity.into();
        active.status = Set(status.as_str().to_string());

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update activity status")?;

        Ok(Some(updated))
    }
}
