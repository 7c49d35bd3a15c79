//! Reply client for the LINE Messaging API.

use crate::dispatch::ReplySender;
use async_trait::async_trait;
use serde::Serialize;

const DEFAULT_API_BASE: &str = "https://api.line.me";

/// Outgoing reply payload: `{ "type": "text", "text": ... }`. Built from a
/// translation or one of the fixed fallback strings, handed to the reply
/// call, then discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyMessage {
    #[serde(rename = "type")]
    pub typ: String,
    pub text: String,
}

impl ReplyMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            typ: "text".to_string(),
            text: text.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReplyError {
    #[error("reply request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("reply api error: {0}")]
    Api(String),
    #[error("channel access token not configured")]
    MissingToken,
}

/// Client for the Messaging API reply endpoint. Built once at startup and
/// shared read-only across requests.
#[derive(Clone)]
pub struct LineClient {
    api_base: String,
    access_token: Option<String>,
    client: reqwest::Client,
}

impl LineClient {
    pub fn new(api_base: Option<String>, access_token: Option<String>) -> Self {
        let api_base = api_base
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Self {
            api_base,
            access_token,
            client: reqwest::Client::new(),
        }
    }

    /// POST /v2/bot/message/reply. Reply tokens are single-use and expire
    /// quickly, so a failed reply is terminal for its event: never retried.
    pub async fn reply_message(
        &self,
        reply_token: &str,
        messages: &[ReplyMessage],
    ) -> Result<(), ReplyError> {
        let token = self.access_token.as_ref().ok_or(ReplyError::MissingToken)?;
        let url = format!("{}/v2/bot/message/reply", self.api_base);
        let body = serde_json::json!({ "replyToken": reply_token, "messages": messages });
        let res = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(ReplyError::Api(format!("{} {}", status, body)));
        }
        Ok(())
    }
}

#[async_trait]
impl ReplySender for LineClient {
    async fn reply(&self, reply_token: &str, message: &ReplyMessage) -> Result<(), ReplyError> {
        self.reply_message(reply_token, std::slice::from_ref(message))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_message_serializes_with_type_field() {
        let message = ReplyMessage::text("สวัสดีโลก");
        let value = serde_json::to_value(&message).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({ "type": "text", "text": "สวัสดีโลก" })
        );
    }
}
