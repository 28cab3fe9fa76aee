use anyhow::{Context, Result};
use clap::Parser;

use debtbook::{logging, polling, telegram::TelegramClient, webhook, Bot, Config};
use libdebtbook::{store, Ledger};

use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::parse();
    logging::init_logging("info", config.log_format);

    let store = store::connect(&config.database_url)
        .await
        .context("failed to open debt store")?;
    let bot = Arc::new(Bot::new(
        Ledger::new(store),
        config.vocabulary(),
        config.chat_id,
    ));
    if config.chat_id.is_none() {
        tracing::warn!("CHAT_ID is not set, every chat can use this ledger");
    }

    let client = TelegramClient::new(&config.api_url, &config.token)?;

    match config.port {
        Some(port) => {
            if config.webhook_secret.is_none() {
                tracing::warn!("WEBHOOK_SECRET is not set, anyone can post updates");
            }
            if let Some(url) = &config.webhook_url {
                client
                    .set_webhook(url, config.webhook_secret.as_deref())
                    .await
                    .with_context(|| format!("failed to register webhook {}", url))?;
                tracing::info!(%url, "webhook registered");
            }
            webhook::serve(bot, port, config.webhook_secret.clone()).await
        }
        None => polling::run(&client, &bot).await,
    }
}
