use crate::debt::DebtEvent;
use crate::LedgerError;

use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Language {
    Russian,
    English,
}

impl FromStr for Language {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ru" | "russian" => Ok(Language::Russian),
            "en" | "english" => Ok(Language::English),
            _ => Err(LedgerError::UnknownLanguage(s.to_string())),
        }
    }
}

/// Everything the bot says back, in one language, with amounts labelled
/// by a fixed unit (there is no currency handling beyond the label).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vocabulary {
    language: Language,
    unit: String,
}

impl Vocabulary {
    pub fn new(language: Language, unit: &str) -> Vocabulary {
        Vocabulary {
            language,
            unit: unit.to_string(),
        }
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn verb(&self) -> &'static str {
        match self.language {
            Language::Russian => "должен",
            Language::English => "owes",
        }
    }

    pub fn recorded(&self, event: &DebtEvent) -> String {
        let head = match self.language {
            Language::Russian => "Записано",
            Language::English => "Recorded",
        };
        format!(
            "{}: @{} {} @{} {}{}",
            head,
            event.debtor,
            self.verb(),
            event.creditor,
            event.amount,
            self.unit
        )
    }

    pub fn format_hint(&self) -> String {
        match self.language {
            Language::Russian => {
                "Не удалось распознать долг. Формат: @user1 должен @user2 100".to_string()
            }
            Language::English => {
                "Could not read that debt. Format: @user1 owes @user2 100".to_string()
            }
        }
    }

    pub fn cleared(&self) -> String {
        match self.language {
            Language::Russian => "Все долги обнулены ✅".to_string(),
            Language::English => "All debts cleared ✅".to_string(),
        }
    }

    /// Reply for a ledger with nothing outstanding.
    pub fn settled(&self) -> String {
        match self.language {
            Language::Russian => "Все долги возвращены 🙌".to_string(),
            Language::English => "All debts are settled 🙌".to_string(),
        }
    }

    pub fn chat_id(&self, chat_id: i64) -> String {
        format!("Chat ID: `{}`", chat_id)
    }

    pub fn failure(&self) -> String {
        match self.language {
            Language::Russian => "Что-то пошло не так, попробуйте позже".to_string(),
            Language::English => "Something went wrong, please try again later".to_string(),
        }
    }
}
