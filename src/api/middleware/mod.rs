//! API middleware components

pub mod logging;
pub mod metrics;
pub mod user_auth;

pub use logging::logging_middleware;
pub use self::metrics::metrics_middleware;
pub use user_auth::AuthUser;
