//! Workout exercise endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};

use crate::api::middleware::AuthUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, DataResponse, Json};
use crate::domain::pagination::{Page, PageQuery};
use crate::infrastructure::services::{CreateWorkoutExerciseRequest, UpdateWorkoutExerciseRequest};

pub async fn create_workout_exercise(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreateWorkoutExerciseRequest>,
) -> Result<Response, ApiError> {
    Ok(DataResponse::created(
        state.workout_exercises.create(request).await?,
    ))
}

pub async fn list_workout_exercises(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Response, ApiError> {
    Ok(DataResponse::ok(
        state.workout_exercises.list(Page::from(query)).await?,
    ))
}

pub async fn get_workout_exercise(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    Ok(DataResponse::ok(state.workout_exercises.get(&id).await?))
}

pub async fn update_workout_exercise(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateWorkoutExerciseRequest>,
) -> Result<Response, ApiError> {
    Ok(DataResponse::ok(
        state.workout_exercises.update(&id, request).await?,
    ))
}

pub async fn delete_workout_exercise(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.workout_exercises.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
