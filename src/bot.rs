use crate::telegram::{SendMessage, Update};
use libdebtbook::{Ledger, LedgerError, Vocabulary};
use tracing::instrument;

const RESET_PHRASES: [&str; 2] = ["обнулить долги", "reset debts"];
const SHOW_PHRASES: [&str; 2] = ["долги", "show debts"];
const CHAT_ID_PHRASES: [&str; 2] = ["чатайди", "chat id"];

/// What an incoming chat message asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Record,
    Reset,
    Show,
    ChatId,
}

impl Command {
    /// `None` for slash commands and for chatter the bot should stay out of.
    pub fn classify(text: &str) -> Option<Command> {
        if text.starts_with('/') {
            return None;
        }

        if libdebtbook::mentions_debt(text) {
            return Some(Command::Record);
        }

        let phrase = text.trim().to_lowercase();
        let phrase = phrase.as_str();
        if RESET_PHRASES.contains(&phrase) {
            Some(Command::Reset)
        } else if SHOW_PHRASES.contains(&phrase) {
            Some(Command::Show)
        } else if CHAT_ID_PHRASES.contains(&phrase) {
            Some(Command::ChatId)
        } else {
            None
        }
    }
}

pub struct Bot {
    ledger: Ledger,
    vocab: Vocabulary,
    allowed_chat: Option<i64>,
}

impl Bot {
    pub fn new(ledger: Ledger, vocab: Vocabulary, allowed_chat: Option<i64>) -> Bot {
        Bot {
            ledger,
            vocab,
            allowed_chat,
        }
    }

    pub fn allows(&self, chat_id: i64) -> bool {
        self.allowed_chat.map_or(true, |allowed| allowed == chat_id)
    }

    /// Answer one chat message, or stay silent.
    ///
    /// Ledger failures become a generic failure reply, they are never
    /// passed off as "no debts".
    #[instrument(skip(self, text))]
    pub async fn handle_text(&self, chat_id: i64, text: &str) -> Option<String> {
        if !self.allows(chat_id) {
            tracing::debug!("chat is not allow-listed");
            return None;
        }

        let Some(command) = Command::classify(text) else {
            tracing::trace!("nothing to answer");
            return None;
        };

        let reply = self.run(chat_id, command, text).await.unwrap_or_else(|err| {
            tracing::error!(%err, ?command, "ledger operation failed");
            self.vocab.failure()
        });
        Some(reply)
    }

    async fn run(&self, chat_id: i64, command: Command, text: &str) -> Result<String, LedgerError> {
        match command {
            Command::Record => match libdebtbook::parse(text) {
                Some(event) => {
                    self.ledger.append(&event).await?;
                    Ok(self.vocab.recorded(&event))
                }
                None => Ok(self.vocab.format_hint()),
            },
            Command::Reset => {
                self.ledger.clear_all().await?;
                Ok(self.vocab.cleared())
            }
            Command::Show => Ok(self.ledger.summarize().await?.render(&self.vocab)),
            Command::ChatId => Ok(self.vocab.chat_id(chat_id)),
        }
    }

    /// Answer a Bot API update. Only text messages are considered.
    pub async fn handle_update(&self, update: &Update) -> Option<SendMessage> {
        let message = update.message.as_ref()?;
        let text = message.text.as_deref()?;

        let sender = message.from.as_ref().and_then(|user| user.username.as_deref());
        if let Some(sent_at) = chrono::DateTime::from_timestamp(message.date, 0) {
            tracing::debug!(update_id = update.update_id, ?sender, %sent_at, "message received");
        }

        let reply = self.handle_text(message.chat.id, text).await?;
        Some(SendMessage {
            chat_id: message.chat.id,
            text: reply,
            reply_to_message_id: Some(message.message_id),
        })
    }
}
