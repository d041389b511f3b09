pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::services::{
    listening_service::ListeningService, notification_service::NotificationService,
    profile_service::ProfileService, reading_service::ReadingService, stats_service::StatsService,
    user_service::UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub reading_service: ReadingService,
    pub listening_service: ListeningService,
    pub stats_service: StatsService,
    pub profile_service: ProfileService,
    pub user_service: UserService,
    pub notification_service: NotificationService,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        let config = crate::config::get_config();

        let reading_service = ReadingService::new(pool.clone());
        let listening_service = ListeningService::new(pool.clone());
        let stats_service = StatsService::new(pool.clone());
        let profile_service = ProfileService::new(pool.clone());
        let user_service = UserService::new(pool.clone());
        let notification_service = NotificationService::new(
            config.telegram_bot_token.clone(),
            config.telegram_admin_chat_id,
        );

        Self {
            pool,
            reading_service,
            listening_service,
            stats_service,
            profile_service,
            user_service,
            notification_service,
        }
    }
}

/// The full application router, shared by the server binary and the
/// integration suites.
pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(routes::core::home))
        .route("/health", get(routes::health::health))
        .route("/api/reading", get(routes::reading::list_tests))
        .route("/api/reading/:test_id", get(routes::reading::get_test))
        .route("/api/listening", get(routes::listening::list_tests))
        .route("/api/listening/:test_id", get(routes::listening::get_test))
        .route("/api/blocked", get(routes::core::blocked_status));

    let authenticated = Router::new()
        .route(
            "/api/reading/:test_id/submit",
            post(routes::reading::submit_test),
        )
        .route(
            "/api/listening/:test_id/submit",
            post(routes::listening::submit_test),
        )
        .route("/api/reading/block-user", post(routes::reading::block_user))
        .route(
            "/api/listening/block-user",
            post(routes::listening::block_user),
        )
        .route("/api/blocked/appeal", post(routes::core::submit_appeal))
        .route_layer(from_fn(middleware::auth::require_auth));

    let staff = Router::new()
        .route("/api/reading/add", post(routes::reading::create_test))
        .route("/api/listening/add", post(routes::listening::create_test))
        .route("/api/add-user", post(routes::core::add_user))
        .route("/api/user-statistics", get(routes::stats::user_statistics))
        .route(
            "/api/user-statistics/:user_id",
            get(routes::stats::user_detail),
        )
        .route_layer(from_fn(middleware::auth::require_staff));

    Router::new()
        .merge(public)
        .merge(authenticated)
        .merge(staff)
        .layer(from_fn_with_state(
            state.clone(),
            middleware::blocked::enforce_block,
        ))
        .layer(from_fn(middleware::auth::authenticate))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
