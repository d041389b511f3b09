use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};
use serde_json::json;

use crate::dto::listening_dto::CreateListeningTestPayload;
use crate::dto::reading_dto::SubmitTestRequest;
use crate::middleware::auth::AuthUser;
use crate::AppState;

#[axum::debug_handler]
pub async fn list_tests(State(state): State<AppState>) -> crate::error::Result<Response> {
    let tests = state.listening_service.list_tests().await?;
    Ok(Json(tests).into_response())
}

#[axum::debug_handler]
pub async fn get_test(
    State(state): State<AppState>,
    Path(test_id): Path<i64>,
) -> crate::error::Result<Response> {
    let detail = state.listening_service.test_detail(test_id).await?;
    Ok(Json(detail).into_response())
}

#[axum::debug_handler]
pub async fn create_test(
    State(state): State<AppState>,
    Json(payload): Json<CreateListeningTestPayload>,
) -> crate::error::Result<Response> {
    let test_id = state.listening_service.create_test(payload).await?;
    tracing::info!("Created listening test {}", test_id);
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
        .listening_service
        .submit_test(test_id, user.id, &request)
        .await?;
    tracing::info!(
        "Listening test {} graded for user {}: {}/{}",
        test_id,
        user.id,
        result.score,
        result.total_questions
    );
    Ok(Json(result).into_response())
}

/// Same block action as the reading module, reachable under both prefixes
/// so either test view can call it.
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
