use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::api::types::ActivityDto;
use crate::db::NewActivity;
use crate::models::ActivityStatus;

#[derive(Debug, Deserialize)]
pub struct CreateActivityRequest {
    pub date: String,
    pub action: String,
    #[serde(default)]
    pub item_category: Option<String>,
    pub recipient: String,
    pub user: String,
    #[serde(default)]
    pub comment: Option<String>,
    /// Defaults to `Approved`; storekeeper requests send `Pending`.
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateActivityStatusRequest {
    pub status: String,
}

fn parse_status(raw: &str) -> Result<ActivityStatus, ApiError> {
    raw.parse().map_err(|()| {
        ApiError::validation(format!(
            "Invalid status '{raw}': expected Pending, Approved or Rejected"
        ))
    })
}

/// GET /api/activities
pub async fn list_activities(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ActivityDto>>, ApiError> {
    let activities = state.store.list_activities().await?;
    Ok(Json(
        activities.into_iter().map(ActivityDto::from).collect(),
    ))
}

/// POST /api/activities
pub async fn create_activity(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateActivityRequest>,
) -> Result<Json<ActivityDto>, ApiError> {
    if payload.action.is_empty() {
        return Err(ApiError::validation("Action description is required"));
    }

    let status = match payload.status.as_deref() {
        Some(raw) => parse_status(raw)?,
        None => ActivityStatus::Approved,
    };

    let activity = state
        .store
        .create_activity(NewActivity {
            date: payload.date,
            action: payload.action,
            item_category: payload.item_category,
            recipient: payload.recipient,
            user: payload.user,
            comment: payload.comment,
            status,
        })
        .await?;

    Ok(Json(ActivityDto::from(activity)))
}

/// PATCH /api/activities/{id}
/// Approval workflow: overwrites the status field only.
pub async fn update_activity_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateActivityStatusRequest>,
) -> Result<Json<ActivityDto>, ApiError> {
    let status = parse_status(&payload.status)?;

    let activity = state
        .store
        .set_activity_status(id, status)
        .await?
        .ok_or_else(|| ApiError::not_found("Activity", id))?;

    tracing::info!("Activity {} status set to {}", id, status);

    Ok(Json(ActivityDto::from(activity)))
}
