use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::middleware::auth::AuthUser;
use crate::AppState;

pub const APPEAL_PATH: &str = "/api/blocked";

/// A blocked non-staff user is redirected to the appeal page from every
/// path except the appeal page itself. Staff are exempt entirely, and a
/// user with no profile row counts as unblocked.
pub async fn enforce_block(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    if let Some(user) = req.extensions().get::<AuthUser>().copied() {
        if !user.is_staff && !req.uri().path().starts_with(APPEAL_PATH) {
            match state.profile_service.is_blocked(user.id).await {
                Ok(true) => return Redirect::temporary(APPEAL_PATH).into_response(),
                Ok(false) => {}
                Err(err) => return err.into_response(),
            }
        }
    }
    next.run(req).await
}
