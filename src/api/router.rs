use axum::{
    extract::State,
    http::{header, Method},
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;
use super::v1;
use crate::infrastructure::observability::PrometheusMetrics;

/// Create the full router with application state
///
/// The Prometheus endpoint is mounted at `metrics_path` only when the state
/// carries a metrics handle.
pub fn create_router(state: AppState, metrics_path: &str) -> Router {
    let metrics = state.metrics.clone();

    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/api/v1", v1::create_v1_router())
        .with_state(state);

    if let Some(metrics) = metrics {
        router = router.merge(create_metrics_router(metrics, metrics_path));
    }

    router
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::PATCH,
        ])
        .allow_headers([header::ACCEPT, header::AUTHORIZATION, header::CONTENT_TYPE])
}

fn create_metrics_router(metrics: PrometheusMetrics, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::api::state::testing::{bearer_for, in_memory_state, state_with_cache};
    use crate::domain::cache::MockCache;
    use crate::domain::User;

    struct TestApp {
        router: Router,
        state: AppState,
    }

    impl TestApp {
        fn new() -> Self {
            Self::with_state(in_memory_state())
        }

        fn with_state(state: AppState) -> Self {
            Self {
                router: create_router(state.clone(), "/metrics"),
                state,
            }
        }

        async fn send(
            &self,
            method: &str,
            uri: &str,
            auth: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(auth) = auth {
                builder = builder.header("authorization", auth);
            }

            let request = match body {
                Some(body) => builder
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap_or(Value::Null)
            };

            (status, value)
        }

        /// Registers a user and logs in, returning the bearer header
        async fn login(&self) -> (String, String) {
            let (status, created) = self
                .send(
                    "POST",
                    "/api/v1/users",
                    None,
                    Some(json!({
                        "email": "jane@example.com",
                        "username": "jane",
                        "password": "correct-horse"
                    })),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED);

            let (status, login) = self
                .send(
                    "POST",
                    "/api/v1/auth/login",
                    None,
                    Some(json!({ "email": "jane@example.com", "password": "correct-horse" })),
                )
                .await;
            assert_eq!(status, StatusCode::OK);

            let token = login["data"]["token"].as_str().unwrap();
            let user_id = created["data"]["id"].as_str().unwrap().to_string();
            (format!("Bearer {}", token), user_id)
        }
    }

    #[tokio::test]
    async fn test_health() {
        let app = TestApp::new();

        let (status, body) = app.send("GET", "/health", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_live() {
        let app = TestApp::new();
        let (status, _) = app.send("GET", "/live", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_healthy() {
        let app = TestApp::new();

        let (status, body) = app.send("GET", "/ready", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["checks"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_ready_degraded_when_cache_down() {
        let app = TestApp::with_state(state_with_cache(Arc::new(MockCache::new().with_error())));

        let (status, body) = app.send("GET", "/ready", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "degraded");
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let app = TestApp::new();

        let (status, body) = app.send("GET", "/api/v1/workouts", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["type"], "authentication_error");

        let (status, _) = app
            .send("GET", "/api/v1/workouts", Some("Bearer not-a-jwt"), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_register_hides_password_hash() {
        let app = TestApp::new();

        let (status, body) = app
            .send(
                "POST",
                "/api/v1/users",
                None,
                Some(json!({
                    "email": "sam@example.com",
                    "username": "sam",
                    "password": "correct-horse",
                    "firstName": "Sam"
                })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["firstName"], "Sam");
        assert!(body["data"].get("passwordHash").is_none());
        assert!(!body.to_string().contains("argon2"));
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let app = TestApp::new();
        app.login().await;

        let (status, body) = app
            .send(
                "POST",
                "/api/v1/auth/login",
                None,
                Some(json!({ "email": "jane@example.com", "password": "wrong-horse" })),
            )
            .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_workout_lifecycle() {
        let app = TestApp::new();
        let (auth, user_id) = app.login().await;
        let auth = Some(auth.as_str());

        let (status, created) = app
            .send(
                "POST",
                "/api/v1/workouts",
                auth,
                Some(json!({ "name": "Leg Day", "durationMinutes": 60 })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["data"]["userId"], user_id.as_str());
        let id = created["data"]["id"].as_str().unwrap().to_string();
        let item = format!("/api/v1/workouts/{}", id);

        let (status, fetched) = app.send("GET", &item, auth, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["data"]["name"], "Leg Day");

        let (status, updated) = app
            .send("PUT", &item, auth, Some(json!({ "name": "Leg Day v2" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["data"]["name"], "Leg Day v2");
        assert_eq!(updated["data"]["durationMinutes"], 60);

        let (_, fetched) = app.send("GET", &item, auth, None).await;
        assert_eq!(fetched["data"]["name"], "Leg Day v2");

        let (status, listed) = app.send("GET", "/api/v1/workouts", auth, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed["data"].as_array().unwrap().len(), 1);

        let (status, body) = app.send("DELETE", &item, auth, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, _) = app.send("GET", &item, auth, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app.send("DELETE", &item, auth, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, listed) = app.send("GET", "/api/v1/workouts", auth, None).await;
        assert!(listed["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_owner_comes_from_token() {
        let app = TestApp::new();
        let (auth, user_id) = app.login().await;
        let someone_else = uuid::Uuid::new_v4();

        let (status, created) = app
            .send(
                "POST",
                "/api/v1/programs",
                Some(auth.as_str()),
                Some(json!({ "name": "Strength block", "userId": someone_else })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["data"]["userId"], user_id.as_str());
        assert_eq!(created["data"]["isActive"], true);
    }

    #[tokio::test]
    async fn test_list_pagination_params() {
        let app = TestApp::new();
        let (auth, _) = app.login().await;
        let auth = Some(auth.as_str());

        for i in 0..3 {
            let (status, _) = app
                .send(
                    "POST",
                    "/api/v1/exercises",
                    auth,
                    Some(json!({ "name": format!("Exercise {}", i) })),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (_, page) = app
            .send("GET", "/api/v1/exercises?limit=2&offset=0", auth, None)
            .await;
        assert_eq!(page["data"].as_array().unwrap().len(), 2);

        let (status, page) = app
            .send("GET", "/api/v1/exercises?limit=abc&offset=-4", auth, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["data"].as_array().unwrap().len(), 3);

        let (_, page) = app
            .send("GET", "/api/v1/exercises?limit=0&offset=2", auth, None)
            .await;
        assert_eq!(page["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_id_is_bad_request() {
        let app = TestApp::new();
        let state = app.state.clone();
        let auth = bearer_for(&state, &User::new("x@example.com", "xuser", ""));

        let (status, body) = app
            .send("GET", "/api/v1/workout-sessions/not-a-uuid", Some(&auth), None)
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["param"], "id");
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let app = TestApp::new();
        let state = app.state.clone();
        let auth = bearer_for(&state, &User::new("x@example.com", "xuser", ""));

        let (status, body) = app
            .send(
                "POST",
                "/api/v1/workout-exercises",
                Some(&auth),
                Some(json!({ "sets": "three" })),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "json_parse_error");
    }

    #[tokio::test]
    async fn test_validation_error_is_bad_request() {
        let app = TestApp::new();
        let (auth, _) = app.login().await;

        let (status, body) = app
            .send(
                "POST",
                "/api/v1/workout-sessions",
                Some(auth.as_str()),
                Some(json!({ "name": "" })),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "invalid_request_error");
    }

    #[tokio::test]
    async fn test_requests_succeed_with_cache_down() {
        let app = TestApp::with_state(state_with_cache(Arc::new(MockCache::new().with_error())));
        let (auth, _) = app.login().await;
        let auth = Some(auth.as_str());

        let (status, created) = app
            .send("POST", "/api/v1/exercises", auth, Some(json!({ "name": "Squat" })))
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let item = format!("/api/v1/exercises/{}", created["data"]["id"].as_str().unwrap());
        let (status, fetched) = app.send("GET", &item, auth, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["data"]["name"], "Squat");

        let (status, _) = app.send("DELETE", &item, auth, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_request_id_propagated() {
        let app = TestApp::new();
        let request = Request::builder()
            .uri("/health")
            .header("x-request-id", "req-123")
            .body(Body::empty())
            .unwrap();

        let response = app.router.clone().oneshot(request).await.unwrap();

        assert_eq!(response.headers()["x-request-id"], "req-123");
    }

    #[tokio::test]
    async fn test_metrics_route_absent_without_handle() {
        let app = TestApp::new();
        let (status, _) = app.send("GET", "/metrics", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
