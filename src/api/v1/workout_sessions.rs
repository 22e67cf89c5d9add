//! Workout session endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};

use crate::api::middleware::AuthUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, DataResponse, Json};
use crate::domain::pagination::{Page, PageQuery};
use crate::infrastructure::services::{CreateWorkoutSessionRequest, UpdateWorkoutSessionRequest};

/// Log a session for the caller
///
/// POST /api/v1/workout-sessions
pub async fn create_workout_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreateWorkoutSessionRequest>,
) -> Result<Response, ApiError> {
    let session = state.workout_sessions.create(auth.user_id, request).await?;
    Ok(DataResponse::created(session))
}

pub async fn list_workout_sessions(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Response, ApiError> {
    Ok(DataResponse::ok(
        state.workout_sessions.list(Page::from(query)).await?,
    ))
}

pub async fn get_workout_session(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    Ok(DataResponse::ok(state.workout_sessions.get(&id).await?))
}

pub async fn update_workout_session(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateWorkoutSessionRequest>,
) -> Result<Response, ApiError> {
    Ok(DataResponse::ok(
        state.workout_sessions.update(&id, request).await?,
    ))
}

pub async fn delete_workout_session(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.workout_sessions.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
