//! Program endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};

use crate::api::middleware::AuthUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, DataResponse, Json};
use crate::domain::pagination::{Page, PageQuery};
use crate::infrastructure::services::{CreateProgramRequest, UpdateProgramRequest};

/// Create a program owned by the caller
///
/// POST /api/v1/programs
pub async fn create_program(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreateProgramRequest>,
) -> Result<Response, ApiError> {
    let program = state.programs.create(auth.user_id, request).await?;
    Ok(DataResponse::created(program))
}

pub async fn list_programs(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Response, ApiError> {
    Ok(DataResponse::ok(state.programs.list(Page::from(query)).await?))
}

pub async fn get_program(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    Ok(DataResponse::ok(state.programs.get(&id).await?))
}

pub async fn update_program(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateProgramRequest>,
) -> Result<Response, ApiError> {
    Ok(DataResponse::ok(state.programs.update(&id, request).await?))
}

pub async fn delete_program(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.programs.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
