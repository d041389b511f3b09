use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
    Extension,
};
use serde_json::json;
use validator::Validate;

use crate::dto::core_dto::{AppealRequest, CreateUserPayload};
use crate::middleware::auth::AuthUser;
use crate::AppState;

#[axum::debug_handler]
pub async fn home() -> Response {
    Json(json!({
        "service": "ielts-backend",
        "status": "ok",
    }))
    .into_response()
}

/// The appeal page. A user who has been unblocked in the meantime is sent
/// back home instead of being shown the appeal form.
#[axum::debug_handler]
pub async fn blocked_status(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
) -> crate::error::Result<Response> {
    if let Some(Extension(user)) = user {
        if !state.profile_service.is_blocked(user.id).await? {
            return Ok(Redirect::to("/").into_response());
        }
    }
    Ok(Json(json!({
        "blocked": true,
        "message": "Your account is blocked. You may submit an appeal below."
    }))
    .into_response())
}

/// Forward the appeal to the operator. A failed send degrades to a warning
/// in the response body; the appeal flow itself still completes.
#[axum::debug_handler]
pub async fn submit_appeal(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<AppealRequest>,
) -> crate::error::Result<Response> {
    request.validate()?;
    let username = state.user_service.get_user(user.id).await?.username;

    match state
        .notification_service
        .send_appeal(user.id, &username, request.message.trim())
        .await
    {
        Ok(()) => Ok(Json(json!({
            "status": "success",
            "message": "Your appeal has been sent to the administrator."
        }))
        .into_response()),
        Err(err) => {
            tracing::warn!("Failed to send appeal for user {}: {}", user.id, err);
            Ok(Json(json!({
                "status": "error",
                "message": "There was an error sending your appeal. Please try again later."
            }))
            .into_response())
        }
    }
}

#[axum::debug_handler]
pub async fn add_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserPayload>,
) -> crate::error::Result<Response> {
    let user = state.user_service.create_user(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": user.id,
            "username": user.username,
            "message": format!("Account created for {}!", user.username)
        })),
    )
        .into_response())
}
