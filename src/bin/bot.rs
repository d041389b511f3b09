use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use ielts_backend::config::{get_config, init_config};
use ielts_backend::database::pool::create_pool;
use ielts_backend::services::bot_service::BotService;
use ielts_backend::services::notification_service::NotificationService;

#[derive(Debug, Deserialize)]
struct GetUpdatesResponse {
    ok: bool,
    #[serde(default)]
    result: Vec<TelegramUpdate>,
}

#[derive(Debug, Deserialize)]
struct TelegramUpdate {
    update_id: i64,
    message: Option<TelegramMessage>,
}

#[derive(Debug, Deserialize)]
struct TelegramMessage {
    chat: TelegramChat,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TelegramChat {
    id: i64,
}

/// Long-polls the Bot API for operator replies to unblock appeals. Runs as
/// its own process; the web app and this listener share only the database.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let service = BotService::new(pool, config.telegram_admin_chat_id);
    let notifier = NotificationService::new(
        config.telegram_bot_token.clone(),
        config.telegram_admin_chat_id,
    );
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(40))
        .build()?;

    info!("Appeal bot listening for admin replies");
    let mut offset: i64 = 0;
    loop {
        let url = format!(
            "https://api.telegram.org/bot{}/getUpdates?timeout=30&offset={}",
            config.telegram_bot_token, offset
        );

        let updates = match client.get(&url).send().await {
            Ok(response) => match response.json::<GetUpdatesResponse>().await {
                Ok(body) if body.ok => body.result,
                Ok(_) => {
                    warn!("Telegram getUpdates returned ok=false");
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    continue;
                }
                Err(err) => {
                    warn!("Failed to parse Telegram updates: {}", err);
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    continue;
                }
            },
            Err(err) => {
                warn!("Telegram getUpdates request failed: {}", err);
                tokio::time::sleep(Duration::from_secs(5)).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            let Some(message) = update.message else {
                continue;
            };
            let Some(text) = message.text else { continue };

            let reply = service.handle_message(message.chat.id, &text).await;
            if let Err(err) = notifier.send_message(message.chat.id, &reply).await {
                warn!("Failed to send bot reply: {}", err);
            }
        }
    }
}
