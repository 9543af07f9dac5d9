//! Telegram Bot API: `getMe` and `sendMessage`.

use crate::client::{ensure_success, transport, ClientError, ClientResult};
use anyhow::anyhow;
use creative_core::models::TelegramBotInfo;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

const API: &str = "Telegram";
pub const DEFAULT_PARSE_MODE: &str = "HTML";

/// Credential blob stored for the Telegram bot
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TelegramCredentials {
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub chat_id: Option<String>,
    #[serde(default)]
    pub bot_username: Option<String>,
    #[serde(default)]
    pub bot_first_name: Option<String>,
}

impl TelegramCredentials {
    /// Chat id, if a non-empty one is stored
    pub fn chat(&self) -> Option<&str> {
        self.chat_id.as_deref().filter(|c| !c.is_empty())
    }
}

/// Every Bot API response is wrapped in `{ok, result}` or `{ok:false, description}`
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

impl<T> Envelope<T> {
    fn into_result(self) -> ClientResult<T> {
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(ClientError::Other(anyhow!(
                "Telegram API error: {}",
                self.description
                    .unwrap_or_else(|| "missing result".to_string())
            ))),
        }
    }
}

#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    api_base: String,
}

impl TelegramClient {
    pub fn new(http: reqwest::Client, api_base: String) -> Self {
        Self { http, api_base }
    }

    fn method_url(&self, bot_token: &str, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, bot_token, method)
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let envelope: Envelope<T> = ensure_success(response, API)
            .await?
            .json()
            .await
            .map_err(transport(API))?;
        envelope.into_result()
    }

    /// Validate the token and return the bot identity
    #[tracing::instrument(skip_all)]
    pub async fn get_me(&self, bot_token: &str) -> ClientResult<TelegramBotInfo> {
        let response = self
            .http
            .get(self.method_url(bot_token, "getMe"))
            .send()
            .await
            .map_err(transport(API))?;
        Self::parse(response).await
    }

    #[tracing::instrument(skip(self, bot_token, text), fields(text_len = text.len()))]
    pub async fn send_message(
        &self,
        bot_token: &str,
        chat_id: &str,
        text: &str,
        parse_mode: Option<&str>,
    ) -> ClientResult<()> {
        let mut body = json!({ "chat_id": chat_id, "text": text });
        if let Some(mode) = parse_mode {
            body["parse_mode"] = json!(mode);
        }

        let response = self
            .http
            .post(self.method_url(bot_token, "sendMessage"))
            .json(&body)
            .send()
            .await
            .map_err(transport(API))?;
        Self::parse::<serde_json::Value>(response).await?;
        Ok(())
    }
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::build_http_client;
    use mockito::Matcher;
    use std::time::Duration;

    fn client(base: &str) -> TelegramClient {
        TelegramClient::new(
            build_http_client(Duration::from_secs(5)).unwrap(),
            base.to_string(),
        )
    }

    #[tokio::test]
    async fn test_get_me() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/bot123:ABC/getMe")
            .with_status(200)
            .with_body(r#"{"ok":true,"result":{"id":42,"is_bot":true,"first_name":"Creatives","username":"creative_bot"}}"#)
            .create_async()
            .await;

        let info = client(&server.url()).get_me("123:ABC").await.unwrap();
        mock.assert_async().await;
        assert_eq!(info.id, 42);
        assert_eq!(info.username.as_deref(), Some("creative_bot"));
        assert_eq!(info.first_name, "Creatives");
    }

    #[tokio::test]
    async fn test_get_me_invalid_token() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/botbad/getMe")
            .with_status(401)
            .with_body(r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#)
            .create_async()
            .await;

        let err = client(&server.url()).get_me("bad").await.unwrap_err();
        assert!(err.is_auth_rejection());
    }

    #[tokio::test]
    async fn test_send_message_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/bot1:x/sendMessage")
            .match_body(Matcher::Json(json!({
                "chat_id": "-100200",
                "text": "<b>hi</b>",
                "parse_mode": "HTML"
            })))
            .with_status(200)
            .with_body(r#"{"ok":true,"result":{"message_id":7}}"#)
            .create_async()
            .await;

        client(&server.url())
            .send_message("1:x", "-100200", "<b>hi</b>", Some(DEFAULT_PARSE_MODE))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_message_not_ok() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/bot1:x/sendMessage")
            .with_status(200)
            .with_body(r#"{"ok":false,"description":"Bad Request: chat not found"}"#)
            .create_async()
            .await;

        let err = client(&server.url())
            .send_message("1:x", "0", "hi", None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("chat not found"));
    }
}
