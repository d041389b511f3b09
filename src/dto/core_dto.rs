use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AppealRequest {
    #[validate(length(min = 1, message = "Please explain why you should be unblocked"))]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserPayload {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[serde(default)]
    pub is_staff: bool,
}
