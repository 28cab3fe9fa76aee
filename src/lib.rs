//! Telegram front for [`libdebtbook`].
//!
//! Everything here is transport: reading configuration, talking to the Bot
//! API, and routing chat messages to the ledger. The ledger itself lives in
//! `libdebtbook`.

/// Routes incoming chat text to ledger operations.
pub mod bot;
pub mod config;
pub mod logging;
/// Long-polling runner.
pub mod polling;
/// Bot API client and wire types.
pub mod telegram;
/// Webhook runner.
pub mod webhook;

pub use bot::Bot;
pub use config::Config;
