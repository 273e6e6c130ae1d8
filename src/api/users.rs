use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::api::types::{StatusResponse, UserDto};
use crate::db::{MigrateCandidate, NewUser, UserPatch};
use crate::models::{Role, UserStatus};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Empty string means "leave unchanged"; the edit form submits an empty
    /// password field when it was not touched.
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MigrateUserRequest {
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

fn parse_role(raw: &str) -> Result<Role, ApiError> {
    raw.parse().map_err(|()| {
        ApiError::validation(format!(
            "Invalid role '{raw}': expected senior-official, manager or storekeeper"
        ))
    })
}

fn parse_user_status(raw: &str) -> Result<UserStatus, ApiError> {
    raw.parse()
        .map_err(|()| ApiError::validation(format!("Invalid status '{raw}': expected Active or Inactive")))
}

/// GET /api/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    let users = state.store.list_users().await?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

/// POST /api/users
/// Direct creation errors on a duplicate username; contrast with migration,
/// which silently skips duplicates.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<UserDto>, ApiError> {
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }
    if payload.name.is_empty() {
        return Err(ApiError::validation("Name is required"));
    }

    let role = parse_role(&payload.role)?;
    let status = match payload.status.as_deref() {
        Some(raw) => parse_user_status(raw)?,
        None => UserStatus::Active,
    };

    if state
        .store
        .get_user_by_username(&payload.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("duplicate username".to_string()));
    }

    let user = state
        .store
        .create_user(NewUser {
            username: payload.username,
            password: payload.password,
            name: payload.name,
            role,
            status,
        })
        .await?;

    tracing::info!("User created: {}", user.username);

    Ok(Json(UserDto::from(user)))
}

/// PATCH /api/users/{id}
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserDto>, ApiError> {
    let role = payload.role.as_deref().map(parse_role).transpose()?;
    let status = payload
        .status
        .as_deref()
        .map(parse_user_status)
        .transpose()?;

    let patch = UserPatch {
        username: payload.username,
        name: payload.name,
        role,
        status,
        password: payload.password.filter(|p| !p.is_empty()),
    };

    let user = state
        .store
        .update_user(id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("User", id))?;

    tracing::info!("User updated: {}", user.username);

    Ok(Json(UserDto::from(user)))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<StatusResponse>, ApiError> {
    let deleted = state.store.delete_user(id).await?;

    if !deleted {
        return Err(ApiError::not_found("User", id));
    }

    tracing::info!("User {} deleted", id);

    Ok(Json(StatusResponse::success("User deleted")))
}

/// POST /api/migrate-users
/// Bulk import with skip-if-exists semantics; always 200.
pub async fn migrate_users(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Vec<MigrateUserRequest>>,
) -> Result<Json<StatusResponse>, ApiError> {
    let mut candidates = Vec::with_capacity(payload.len());
    for candidate in payload {
        if candidate.username.is_empty() {
            return Err(ApiError::validation("Username is required"));
        }

        let role = candidate.role.as_deref().map(parse_role).transpose()?;
        let status = candidate
            .status
            .as_deref()
            .map(parse_user_status)
            .transpose()?;

        candidates.push(MigrateCandidate {
            username: candidate.username,
            password: candidate.password,
            name: candidate.name,
            role,
            status,
        });
    }

    let inserted = state.store.migrate_users(candidates).await?;

    tracing::info!("Migrated {} users", inserted);

    Ok(Json(StatusResponse::success("Users migrated successfully")))
}
