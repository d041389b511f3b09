use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};
use serde_json::json;

use crate::dto::reading_dto::{CreateReadingTestPayload, SubmitTestRequest};
use crate::middleware::auth::AuthUser;
use crate::AppState;

#[axum::debug_handler]
pub async fn list_tests(State(state): State<AppState>) -> crate::error::Result<Response> {
    let tests = state.reading_service.list_tests().await?;
    Ok(Json(tests).into_response())
}

#[axum::debug_handler]
pub async fn get_test(
    State(state): State<AppState>,
    Path(test_id): Path<i64>,
) -> crate::error::Result<Response> {
    let detail = state.reading_service.test_detail(test_id).await?;
    Ok(Json(detail).into_response())
}

#[axum::debug_handler]
pub async fn create_test(
    State(state): State<AppState>,
    Json(payload): Json<CreateReadingTestPayload>,
) -> crate::error::Result<Response> {
    let test_id = state.reading_service.create_test(payload).await?;
    tracing::info!("Created reading test {}", test_id);
    Ok((StatusCode::CREATED, Json(json!({ "id": test_id }))).into_response())
}

#[axum::debug_handler]
pub async fn submit_test(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(test_id): Path<i64>,
    Json(request): Json<SubmitTestRequest>,
) -> crate::error::Result<Response> {
    let result = state
        .reading_service
        .submit_test(test_id, user.id, &request)
        .await?;
    tracing::info!(
        "Reading test {} graded for user {}: {}/{}",
        test_id,
        user.id,
        result.score,
        result.total_questions
    );
    Ok(Json(result).into_response())
}

/// Called by the client when it detects a forbidden action during a test.
#[axum::debug_handler]
pub async fn block_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> crate::error::Result<Response> {
    state.profile_service.block(user.id).await?;
    tracing::warn!("Anti-cheat: user {} blocked", user.id);
    Ok(Json(json!({
        "status": "success",
        "message": "User has been blocked."
    }))
    .into_response())
}
