use serde::Serialize;

use crate::db::User;
use crate::entities::{activities, items};

/// Directory entry as exposed over the wire. The password hash never leaves
/// the repository layer.
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub name: String,
    pub role: String,
    pub status: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            role: user.role,
            status: user.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ItemDto {
    pub id: i32,
    pub name: String,
    pub category: String,
}

impl From<items::Model> for ItemDto {
    fn from(item: items::Model) -> Self {
        Self {
            id: item.id,
            name: item.name,
            category: item.category,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ActivityDto {
    pub id: i32,
    pub date: String,
    pub action: String,
    pub item_category: Option<String>,
    pub recipient: String,
    pub user: String,
    pub comment: Option<String>,
    pub status: String,
    pub created_at: String,
}

impl From<activities::Model> for ActivityDto {
    fn from(activity: activities::Model) -> Self {
        Self {
            id: activity.id,
            date: activity.date,
            action: activity.action,
            item_category: activity.item_category,
            recipient: activity.recipient,
            user: activity.user,
            comment: activity.comment,
            status: activity.status,
            created_at: activity.created_at,
        }
    }
}

/// Generic outcome body for delete/migrate operations
/// (the frontend checks `response.status === "success"`).
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

impl StatusResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}
