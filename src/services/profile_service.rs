use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::profile::Profile;

/// Owns the single piece of anti-cheating state. The web process only ever
/// sets `is_blocked` true; the appeal bot is the only writer that clears it.
#[derive(Clone)]
pub struct ProfileService {
    pool: SqlitePool,
}

impl ProfileService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, user_id: i64) -> Result<Option<Profile>> {
        let profile =
            sqlx::query_as::<_, Profile>(r#"SELECT * FROM profiles WHERE user_id = ?1"#)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(profile)
    }

    /// The one profile lookup. A user without a profile row is unblocked.
    pub async fn is_blocked(&self, user_id: i64) -> Result<bool> {
        Ok(self
            .find(user_id)
            .await?
            .map(|profile| profile.is_blocked)
            .unwrap_or(false))
    }

    /// Idempotent: creates the profile if absent, then forces the flag true.
    pub async fn block(&self, user_id: i64) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO profiles (user_id, is_blocked) VALUES (?1, TRUE)
               ON CONFLICT(user_id) DO UPDATE SET is_blocked = TRUE"#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Clears the flag. Errors with not-found when no profile row exists,
    /// so the bot can tell the operator.
    pub async fn unblock(&self, user_id: i64) -> Result<()> {
        let result = sqlx::query(r#"UPDATE profiles SET is_blocked = FALSE WHERE user_id = ?1"#)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(crate::error::Error::NotFound(format!(
                "No profile found for User ID {}",
                user_id
            )));
        }
        Ok(())
    }
}
