use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: Option<String>,
}

/// Authenticated actor derived from the bearer token. The identity
/// provider issues the tokens; this layer only reads them.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: i64,
    pub is_staff: bool,
}

fn unauthorized(code: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": code }))).into_response()
}

/// Optional authentication. Test lists and details are public, so a
/// missing header passes through anonymously; a present-but-invalid token
/// is still rejected.
pub async fn authenticate(mut req: Request, next: Next) -> Response {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return next.run(req).await;
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return unauthorized("bad_authorization");
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return unauthorized("unsupported_scheme");
    };

    let config = crate::config::get_config();
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => {
            let Ok(id) = data.claims.sub.parse::<i64>() else {
                return unauthorized("invalid_token");
            };
            let role = data.claims.role.clone().unwrap_or_default();
            let is_staff = ["staff", "admin"]
                .iter()
                .any(|r| r.eq_ignore_ascii_case(&role));
            req.extensions_mut().insert(data.claims);
            req.extensions_mut().insert(AuthUser { id, is_staff });
            next.run(req).await
        }
        Err(_) => unauthorized("invalid_token"),
    }
}

pub async fn require_auth(req: Request, next: Next) -> Response {
    if req.extensions().get::<AuthUser>().is_none() {
        return unauthorized("missing_authorization");
    }
    next.run(req).await
}

pub async fn require_staff(req: Request, next: Next) -> Response {
    match req.extensions().get::<AuthUser>() {
        None => unauthorized("missing_authorization"),
        Some(user) if !user.is_staff => {
            (StatusCode::FORBIDDEN, Json(json!({ "error": "forbidden" }))).into_response()
        }
        Some(_) => next.run(req).await,
    }
}
