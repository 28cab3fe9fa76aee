//! Command-line and environment configuration.
//!
//! Every flag falls back to an environment variable, and `main` loads a
//! `.env` file before parsing, so a hosted deployment only needs env vars.

use crate::logging::LogFormat;
use clap::Parser;
use libdebtbook::{Language, Vocabulary};

/// Chat bot that books `@alice owes @bob 100` messages and nets them.
#[derive(Parser, Debug, Clone)]
#[command(name = "debtbook", version, about)]
pub struct Config {
    /// Telegram bot token.
    #[arg(long, env = "TOKEN", hide_env_values = true)]
    pub token: String,

    /// Store location: `postgres://...`, `sqlite://...` or `memory:`.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite://debts.db?mode=rwc",
        hide_env_values = true
    )]
    pub database_url: String,

    /// Only this chat is served. Without it every chat is, which is handy
    /// for asking the bot for a chat's id.
    #[arg(long, env = "CHAT_ID", allow_hyphen_values = true)]
    pub chat_id: Option<i64>,

    /// Run as a webhook service on this port instead of long-polling.
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Public URL to register with Telegram in webhook mode.
    #[arg(long, env = "WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Shared secret Telegram sends with every webhook update.
    #[arg(long, env = "WEBHOOK_SECRET", hide_env_values = true, value_parser = parse_secret)]
    pub webhook_secret: Option<String>,

    /// Reply language, `ru` or `en`.
    #[arg(long, env = "DEBTS_LANGUAGE", default_value = "ru")]
    pub language: Language,

    /// Unit label appended to every amount.
    #[arg(long, env = "DEBTS_UNIT", default_value = "PLN")]
    pub unit: String,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value = "pretty")]
    pub log_format: LogFormat,

    /// Bot API endpoint.
    #[arg(long, env = "TELEGRAM_API_URL", default_value = "https://api.telegram.org")]
    pub api_url: String,
}

impl Config {
    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary::new(self.language, &self.unit)
    }
}

/// Telegram takes 1 to 256 characters out of `A-Z`, `a-z`, `0-9`, `_` and `-`.
fn parse_secret(s: &str) -> Result<String, String> {
    let valid = !s.is_empty()
        && s.len() <= 256
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(s.to_string())
    } else {
        Err("expected 1-256 characters of A-Z, a-z, 0-9, _ or -".to_string())
    }
}
