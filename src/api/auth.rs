use axum::{
    Json,
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::auth::{self, Claims};
use crate::models::Role;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: LoginUser,
}

#[derive(Debug, Serialize)]
pub struct LoginUser {
    pub name: String,
    pub role: String,
    pub username: String,
}

/// Requires a valid bearer token on every route behind it and exposes the
/// verified claims to handlers via request extensions.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(&headers)
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

    let claims = auth::verify_token(token, &state.config.auth.jwt_secret)
        .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

    request.extensions_mut().insert::<Claims>(claims);

    Ok(next.run(request).await)
}

fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    auth::extract_bearer(header.to_str().ok()?)
}

/// POST /api/login
/// Verifies credentials and issues a time-bound bearer token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let is_valid = state
        .store
        .verify_user_password(&payload.username, &payload.password)
        .await?;

    if !is_valid {
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let user = state
        .store
        .get_user_by_username(&payload.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".to_string()))?;

    // Roles are written by the closed vocabulary at every boundary, so a row
    // that fails to parse here means the store was edited out of band.
    let role: Role = user
        .role
        .parse()
        .map_err(|()| ApiError::internal(format!("Unknown role stored for {}", user.username)))?;

    let access_token = auth::issue_token(
        &user.username,
        role,
        &state.config.auth.jwt_secret,
        state.config.auth.token_ttl_minutes,
    )
    .map_err(|e| ApiError::internal(format!("Failed to issue token: {e}")))?;

    tracing::info!("User logged in: {}", user.username);

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer".to_string(),
        user: LoginUser {
            name: user.name,
            role: user.role,
            username: user.username,
        },
    }))
}
