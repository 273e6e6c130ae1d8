use axum::{Json, extract::State};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::api::types::ItemDto;

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    pub category: String,
}

/// GET /api/items
pub async fn list_items(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ItemDto>>, ApiError> {
    let items = state.store.list_items().await?;
    Ok(Json(items.into_iter().map(ItemDto::from).collect()))
}

/// POST /api/items
/// No uniqueness check; duplicate names and categories are permitted.
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateItemRequest>,
) -> Result<Json<ItemDto>, ApiError> {
    if payload.name.is_empty() {
        return Err(ApiError::validation("Item name is required"));
    }
    if payload.category.is_empty() {
        return Err(ApiError::validation("Item category is required"));
    }

    let item = state
        .store
        .create_item(payload.name, payload.category)
        .await?;

    Ok(Json(ItemDto::from(item)))
}
