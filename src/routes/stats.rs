use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Response},
};

use crate::AppState;

#[axum::debug_handler]
pub async fn user_statistics(State(state): State<AppState>) -> crate::error::Result<Response> {
    let rows = state.stats_service.overview().await?;
    Ok(Json(rows).into_response())
}

#[axum::debug_handler]
pub async fn user_detail(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> crate::error::Result<Response> {
    let detail = state.stats_service.user_detail(user_id).await?;
    Ok(Json(detail).into_response())
}
