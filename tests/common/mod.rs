#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value as JsonValue;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "test_secret_key";

/// Fresh app over an in-memory database. Config is process-wide, so every
/// suite sets the same values before the first init wins.
pub async fn setup() -> (Router, SqlitePool) {
    std::env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    std::env::set_var("DATABASE_URL", "sqlite::memory:");
    std::env::set_var("JWT_SECRET", JWT_SECRET);
    std::env::set_var("TELEGRAM_BOT_TOKEN", "test-token");
    std::env::set_var("TELEGRAM_ADMIN_CHAT_ID", "99");
    let _ = ielts_backend::config::init_config();

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    let state = ielts_backend::AppState::new(pool.clone());
    (ielts_backend::build_router(state), pool)
}

pub async fn seed_user(pool: &SqlitePool, username: &str, is_staff: bool) -> i64 {
    sqlx::query(r#"INSERT INTO users (username, is_staff, created_at) VALUES (?1, ?2, ?3)"#)
        .bind(username)
        .bind(is_staff)
        .bind(Utc::now())
        .execute(pool)
        .await
        .expect("seed user")
        .last_insert_rowid()
}

pub fn bearer_token(user_id: i64, is_staff: bool) -> String {
    let claims = ielts_backend::middleware::auth::Claims {
        sub: user_id.to_string(),
        exp: 4102444800, // far enough out for any test run
        role: Some(if is_staff { "staff" } else { "student" }.to_string()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("token")
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<JsonValue>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn json_body(response: Response) -> JsonValue {
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn expect_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<JsonValue>,
    status: StatusCode,
) -> JsonValue {
    let response = send(app, method, uri, token, body).await;
    assert_eq!(response.status(), status, "unexpected status for {}", uri);
    json_body(response).await
}
