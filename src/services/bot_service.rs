use sqlx::SqlitePool;

use crate::error::Result;
use crate::services::profile_service::ProfileService;

/// An operator reply, parsed from the literal `yes <user_id>` /
/// `no <user_id>` convention the appeal message asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCommand {
    Unblock(i64),
    KeepBlocked(i64),
}

/// Parse failures carry the exact reply the operator should see.
pub fn parse_admin_command(text: &str) -> std::result::Result<AdminCommand, String> {
    let normalized = text.trim().to_lowercase();
    let parts: Vec<&str> = normalized.split_whitespace().collect();
    if parts.len() != 2 {
        return Err("Invalid format. Use: yes <user_id> or no <user_id>".to_string());
    }

    let user_id: i64 = parts[1]
        .parse()
        .map_err(|_| "Invalid user ID. It must be a number.".to_string())?;

    match parts[0] {
        "yes" => Ok(AdminCommand::Unblock(user_id)),
        "no" => Ok(AdminCommand::KeepBlocked(user_id)),
        _ => Err("Unknown command. Use 'yes <user_id>' or 'no <user_id>'".to_string()),
    }
}

/// Handles operator replies for the appeal workflow. Runs in its own
/// process and talks to the web app only through the shared database.
#[derive(Clone)]
pub struct BotService {
    pool: SqlitePool,
    profiles: ProfileService,
    admin_chat_id: i64,
}

impl BotService {
    pub fn new(pool: SqlitePool, admin_chat_id: i64) -> Self {
        let profiles = ProfileService::new(pool.clone());
        Self {
            pool,
            profiles,
            admin_chat_id,
        }
    }

    /// Turn an incoming message into the reply to send back. Every failure
    /// mode resolves to an operator-facing string; this side channel must
    /// never crash the process.
    pub async fn handle_message(&self, chat_id: i64, text: &str) -> String {
        if chat_id != self.admin_chat_id {
            return "You are not authorized to perform this action.".to_string();
        }

        let command = match parse_admin_command(text) {
            Ok(command) => command,
            Err(reply) => return reply,
        };

        match self.apply(command).await {
            Ok(reply) => reply,
            Err(err) => format!("An unexpected error occurred: {}", err),
        }
    }

    async fn apply(&self, command: AdminCommand) -> Result<String> {
        match command {
            AdminCommand::Unblock(user_id) => {
                let Some(username) = self.profile_username(user_id).await? else {
                    return Ok(format!("No profile found for User ID {}.", user_id));
                };
                self.profiles.unblock(user_id).await?;
                Ok(format!(
                    "User '{}' (ID: {}) has been unblocked.",
                    username, user_id
                ))
            }
            AdminCommand::KeepBlocked(user_id) => {
                let Some(username) = self.profile_username(user_id).await? else {
                    return Ok(format!("No profile found for User ID {}.", user_id));
                };
                Ok(format!(
                    "User '{}' (ID: {}) will remain blocked.",
                    username, user_id
                ))
            }
        }
    }

    async fn profile_username(&self, user_id: i64) -> Result<Option<String>> {
        let username = sqlx::query_scalar::<_, String>(
            r#"SELECT u.username FROM users u
               JOIN profiles p ON p.user_id = u.id
               WHERE u.id = ?1"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(username)
    }
}
