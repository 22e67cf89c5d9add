//! User endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use tracing::info;

use crate::api::middleware::AuthUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, DataResponse, Json};
use crate::domain::pagination::{Page, PageQuery};
use crate::infrastructure::user::{CreateUserRequest, UpdateUserRequest};

/// Register a new user
///
/// POST /api/v1/users
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Response, ApiError> {
    let user = state.users.create(request).await?;
    info!(user_id = %user.id, "User registered");

    Ok(DataResponse::created(user))
}

/// GET /api/v1/users
pub async fn list_users(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Response, ApiError> {
    let users = state.users.list(Page::from(query)).await?;
    Ok(DataResponse::ok(users))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    Ok(DataResponse::ok(state.users.get(&id).await?))
}

/// PUT /api/v1/users/{id}
pub async fn update_user(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Response, ApiError> {
    Ok(DataResponse::ok(state.users.update(&id, request).await?))
}

/// DELETE /api/v1/users/{id}
pub async fn delete_user(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.users.delete(&id).await?;
    info!(user_id = %id, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}
