//! Success envelope

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Wraps every successful payload as `{"data": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn ok(data: T) -> Response {
        (StatusCode::OK, Json(Self { data })).into_response()
    }

    pub fn created(data: T) -> Response {
        (StatusCode::CREATED, Json(Self { data })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let json = serde_json::to_value(DataResponse { data: vec![1, 2] }).unwrap();
        assert_eq!(json, serde_json::json!({ "data": [1, 2] }));
    }

    #[test]
    fn test_created_status() {
        assert_eq!(DataResponse::created("x").status(), StatusCode::CREATED);
        assert_eq!(DataResponse::ok("x").status(), StatusCode::OK);
    }
}
