//! Typed client for the Bot API methods the bot uses.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::prelude::*;
use crate::req::HttpClient;
use crate::telegram::types::{ApiResponse, Chat, Message, Update, User};
use crate::{Error, TELEGRAM_API_URL};

#[derive(Serialize)]
struct GetUpdatesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
    allowed_updates: &'static [&'static str],
}

#[derive(Serialize)]
struct GetChatRequest {
    chat_id: i64,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
}

#[derive(Serialize)]
struct EditMessageTextRequest<'a> {
    chat_id: i64,
    message_id: i64,
    text: &'a str,
}

#[derive(Serialize)]
struct Empty {}

pub struct BotClient {
    http_client: HttpClient,
}

impl std::fmt::Debug for BotClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotClient")
            .field("http_client", &self.http_client)
            .finish()
    }
}

impl BotClient {
    /// Create a client for the given bot token against the public API
    /// front-end.
    pub fn new(token: &str) -> Self {
        Self::with_base_url(format!("{TELEGRAM_API_URL}/bot{token}"))
    }

    /// Create a client against an arbitrary base URL (self-hosted API
    /// servers, tests).
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http_client: HttpClient::new(base_url),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        payload: &impl Serialize,
    ) -> Result<T> {
        let body = serde_json::to_string(payload).map_err(|e| Error::json_parse(e.to_string()))?;
        let text = self.http_client.post(method, body).await?;
        let envelope: ApiResponse<T> =
            serde_json::from_str(&text).map_err(|e| Error::json_parse(e.to_string()))?;
        if !envelope.ok {
            return Err(Error::api(
                envelope.error_code,
                envelope
                    .description
                    .unwrap_or_else(|| "unknown API error".to_string()),
            ));
        }
        envelope
            .result
            .ok_or_else(|| Error::api(None, "missing result in ok response"))
    }

    /// Identify the bot behind the token. Used as the startup auth check.
    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", &Empty {}).await
    }

    /// Fetch chat metadata. Used for startup channel-access verification.
    pub async fn get_chat(&self, chat_id: i64) -> Result<Chat> {
        self.call("getChat", &GetChatRequest { chat_id }).await
    }

    /// Long-poll for updates after `offset`, waiting up to `timeout_secs`
    /// server-side.
    pub async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>> {
        self.call(
            "getUpdates",
            &GetUpdatesRequest {
                offset,
                timeout: timeout_secs,
                allowed_updates: &[
                    "message",
                    "edited_message",
                    "channel_post",
                    "edited_channel_post",
                ],
            },
        )
        .await
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<Message> {
        self.call("sendMessage", &SendMessageRequest { chat_id, text })
            .await
    }

    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> Result<Message> {
        self.call(
            "editMessageText",
            &EditMessageTextRequest {
                chat_id,
                message_id,
                text,
            },
        )
        .await
    }
}
