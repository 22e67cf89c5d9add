//! Workout endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};

use crate::api::middleware::AuthUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, DataResponse, Json};
use crate::domain::pagination::{Page, PageQuery};
use crate::infrastructure::services::{CreateWorkoutRequest, UpdateWorkoutRequest};

/// Create a workout owned by the caller
///
/// POST /api/v1/workouts
pub async fn create_workout(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreateWorkoutRequest>,
) -> Result<Response, ApiError> {
    let workout = state.workouts.create(auth.user_id, request).await?;
    Ok(DataResponse::created(workout))
}

pub async fn list_workouts(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Response, ApiError> {
    Ok(DataResponse::ok(state.workouts.list(Page::from(query)).await?))
}

pub async fn get_workout(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    Ok(DataResponse::ok(state.workouts.get(&id).await?))
}

pub async fn update_workout(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateWorkoutRequest>,
) -> Result<Response, ApiError> {
    Ok(DataResponse::ok(state.workouts.update(&id, request).await?))
}

pub async fn delete_workout(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.workouts.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
