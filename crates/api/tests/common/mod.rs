#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::PgPool;
use tower::ServiceExt;

use trainhub_api::auth::jwt::{Claims, JwtConfig};
use trainhub_api::config::ServerConfig;
use trainhub_api::router::build_app_router;
use trainhub_api::state::AppState;
use trainhub_core::clock::SystemClock;
use trainhub_notify::push::SimulatedPushProvider;
use trainhub_notify::{NotificationService, Scheduler, SchedulerConfig, Stores};

pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
        },
        scheduler: SchedulerConfig::default(),
        push_timeout_secs: 10,
        push_gateway_url: None,
    }
}

/// Build the full application router over `pool`, with simulated pushes.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let service = NotificationService::new(
        Stores::postgres(pool.clone()),
        Arc::new(SimulatedPushProvider),
        Duration::from_secs(config.push_timeout_secs),
    );
    let scheduler = Scheduler::new(service, Arc::new(SystemClock), config.scheduler.clone());

    build_app_router(AppState {
        pool,
        config: Arc::new(config),
        scheduler,
    })
}

/// Sign a one-hour access token for `user_id` with `role`.
pub fn token_for(user_id: i64, role: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp: now + 3600,
        iat: now,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_auth(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
