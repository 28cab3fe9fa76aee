use crate::bot::Bot;
use crate::telegram::{TelegramClient, Update};

use anyhow::{Context, Result};
use tokio::time::sleep;

use std::time::Duration;

/// Pause after a failed `getUpdates` before asking again.
const BACKOFF: Duration = Duration::from_secs(5);

/// Offset that acknowledges every update in `updates`.
pub fn next_offset(current: i64, updates: &[Update]) -> i64 {
    updates
        .iter()
        .map(|update| update.update_id + 1)
        .fold(current, i64::max)
}

/// Long-poll `getUpdates` until Ctrl-C.
///
/// Updates are answered one at a time, in the order Telegram hands them out.
pub async fn run(client: &TelegramClient, bot: &Bot) -> Result<()> {
    client
        .delete_webhook()
        .await
        .context("failed to remove webhook before polling")?;
    tracing::info!("polling for updates");

    let mut offset = 0;
    loop {
        let updates = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                return Ok(());
            }
            updates = client.get_updates(offset) => updates,
        };

        let updates = match updates {
            Ok(updates) => updates,
            Err(err) => {
                tracing::warn!(%err, "getUpdates failed, retrying in {:?}", BACKOFF);
                sleep(BACKOFF).await;
                continue;
            }
        };

        for update in &updates {
            let Some(reply) = bot.handle_update(update).await else {
                continue;
            };
            if let Err(err) = client.send_message(&reply).await {
                tracing::error!(%err, chat_id = reply.chat_id, "reply was not delivered");
            }
        }
        offset = next_offset(offset, &updates);
    }
}
