//! Authentication API endpoints
//!
//! Login issues a stateless JWT; there is no server-side session to end.

use axum::{extract::State, response::Response, routing::post, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, DataResponse, Json};
use crate::domain::User;

pub fn create_auth_router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

/// Login with email and password
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let user = state
        .users
        .authenticate(&request.email, &request.password)
        .await?;

    let issued = state.jwt.generate(&user)?;
    info!(user_id = %user.id, "User logged in");

    Ok(DataResponse::ok(LoginResponse {
        token: issued.token,
        expires_at: issued.expires_at,
        user,
    }))
}
