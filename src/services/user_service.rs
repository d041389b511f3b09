use chrono::Utc;
use sqlx::SqlitePool;
use validator::Validate;

use crate::dto::core_dto::CreateUserPayload;
use crate::error::{Error, Result};
use crate::models::user::User;

#[derive(Clone)]
pub struct UserService {
    pool: SqlitePool,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_user(&self, user_id: i64) -> Result<User> {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE id = ?1"#)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    /// Create the user together with its profile row, atomically.
    pub async fn create_user(&self, payload: CreateUserPayload) -> Result<User> {
        payload.validate()?;
        let username = payload.username.trim().to_string();

        let taken: bool =
            sqlx::query_scalar(r#"SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)"#)
                .bind(&username)
                .fetch_one(&self.pool)
                .await?;
        if taken {
            return Err(Error::BadRequest(format!(
                "Username '{}' is already taken",
                username
            )));
        }

        let mut tx = self.pool.begin().await?;
        let now = Utc::now();
        let user_id = sqlx::query(
            r#"INSERT INTO users (username, is_staff, created_at) VALUES (?1, ?2, ?3)"#,
        )
        .bind(&username)
        .bind(payload.is_staff)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        sqlx::query(r#"INSERT INTO profiles (user_id, is_blocked) VALUES (?1, FALSE)"#)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(User {
            id: user_id,
            username,
            is_staff: payload.is_staff,
            created_at: now,
        })
    }
}
