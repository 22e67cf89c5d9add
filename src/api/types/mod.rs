//! Request and response types shared by every endpoint

pub mod error;
pub mod json;
pub mod response;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use json::Json;
pub use response::DataResponse;
