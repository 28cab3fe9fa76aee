use anyhow::{anyhow, Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use std::time::Duration;

/// Long-poll window handed to `getUpdates`, in seconds.
pub const POLL_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Message {
    pub message_id: i64,
    /// Unix time the message was sent.
    pub date: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Chat {
    pub id: i64,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

/// `sendMessage` parameters.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SendMessage {
    pub chat_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<i64>,
}

/// A method call returned as the body of a webhook response, which
/// Telegram executes on the bot's behalf.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct WebhookReply {
    pub method: &'static str,
    #[serde(flatten)]
    pub message: SendMessage,
}

impl From<SendMessage> for WebhookReply {
    fn from(message: SendMessage) -> Self {
        WebhookReply {
            method: "sendMessage",
            message,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default = "Option::default")]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

impl<T> ApiResponse<T> {
    fn into_result(self, method: &str) -> Result<T> {
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            (true, None) => Err(anyhow!(format!("{}: response without result", method))),
            (false, _) => Err(anyhow!(format!(
                "{}: {}",
                method,
                self.description.unwrap_or_else(|| "unknown error".to_string())
            ))),
        }
    }
}

#[derive(Serialize)]
struct GetUpdates {
    offset: i64,
    timeout: u64,
    allowed_updates: [&'static str; 1],
}

#[derive(Serialize)]
struct SetWebhook<'a> {
    url: &'a str,
    allowed_updates: [&'static str; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    secret_token: Option<&'a str>,
}

/// Thin Bot API client, only the methods the bot needs.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    base: String,
}

impl TelegramClient {
    pub fn new(api_url: &str, token: &str) -> Result<TelegramClient> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 10))
            .build()
            .context("failed to build HTTP client")?;

        Ok(TelegramClient {
            http,
            base: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
        })
    }

    async fn call<P: Serialize, T: DeserializeOwned>(&self, method: &str, params: &P) -> Result<T> {
        // The URL carries the token, keep it out of error messages.
        let response = self
            .http
            .post(format!("{}/{}", self.base, method))
            .json(params)
            .send()
            .await
            .map_err(|e| anyhow!(format!("{}: {}", method, e.without_url())))?;

        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| anyhow!(format!("{}: {}", method, e.without_url())))?;

        envelope.into_result(method)
    }

    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        let params = GetUpdates {
            offset,
            timeout: POLL_TIMEOUT_SECS,
            allowed_updates: ["message"],
        };
        self.call("getUpdates", &params).await
    }

    pub async fn send_message(&self, message: &SendMessage) -> Result<()> {
        let _sent: serde_json::Value = self.call("sendMessage", message).await?;
        Ok(())
    }

    pub async fn set_webhook(&self, url: &str, secret_token: Option<&str>) -> Result<()> {
        let params = SetWebhook {
            url,
            allowed_updates: ["message"],
            secret_token,
        };
        let _set: bool = self.call("setWebhook", &params).await?;
        Ok(())
    }

    pub async fn delete_webhook(&self) -> Result<()> {
        let _deleted: bool = self
            .call("deleteWebhook", &serde_json::json!({}))
            .await?;
        Ok(())
    }
}
