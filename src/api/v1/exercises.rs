//! Exercise catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};

use crate::api::middleware::AuthUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, DataResponse, Json};
use crate::domain::pagination::{Page, PageQuery};
use crate::infrastructure::services::{CreateExerciseRequest, UpdateExerciseRequest};

pub async fn create_exercise(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreateExerciseRequest>,
) -> Result<Response, ApiError> {
    Ok(DataResponse::created(state.exercises.create(request).await?))
}

pub async fn list_exercises(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Response, ApiError> {
    Ok(DataResponse::ok(state.exercises.list(Page::from(query)).await?))
}

pub async fn get_exercise(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    Ok(DataResponse::ok(state.exercises.get(&id).await?))
}

pub async fn update_exercise(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateExerciseRequest>,
) -> Result<Response, ApiError> {
    Ok(DataResponse::ok(state.exercises.update(&id, request).await?))
}

pub async fn delete_exercise(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.exercises.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
