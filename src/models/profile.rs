use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One-to-one extension of a user row. `is_blocked` is the only
/// anti-cheating state the platform keeps.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub user_id: i64,
    pub is_blocked: bool,
}
