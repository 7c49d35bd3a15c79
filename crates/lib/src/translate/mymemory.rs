//! MyMemory translation API client (https://api.mymemory.translated.net).

use crate::dispatch::Translator;
use async_trait::async_trait;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://api.mymemory.translated.net";

/// Client for the MyMemory HTTP API. Built once at startup and shared
/// read-only across dispatches. No timeout and no retries: a hung provider
/// call hangs only that event's slot in the batch.
#[derive(Clone)]
pub struct MyMemoryClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("translation request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("translation api error: {0}")]
    Api(String),
}

impl MyMemoryClient {
    pub fn new(base_url: Option<String>) -> Self {
        let base_url = base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// GET /get?q=...&langpair=source|target. Any 2xx body that parses is Ok;
    /// the translated-text field may still be absent.
    pub async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<TranslateResponse, TranslateError> {
        let url = format!("{}/get", self.base_url);
        let langpair = format!("{}|{}", source, target);
        let res = self
            .client
            .get(&url)
            .query(&[("q", text), ("langpair", langpair.as_str())])
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(TranslateError::Api(format!("{} {}", status, body)));
        }
        let data: TranslateResponse = res.json().await?;
        Ok(data)
    }
}

#[async_trait]
impl Translator for MyMemoryClient {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<Option<String>, TranslateError> {
        let res = MyMemoryClient::translate(self, text, source, target).await?;
        Ok(res.translated_text().map(|s| s.to_string()))
    }
}

/// MyMemory response body. Every level is optional so a well-formed but
/// empty response deserializes instead of failing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    #[serde(default)]
    pub response_data: Option<ResponseData>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseData {
    #[serde(default)]
    pub translated_text: Option<String>,
}

impl TranslateResponse {
    /// Translated text, if the provider returned one.
    pub fn translated_text(&self) -> Option<&str> {
        self.response_data
            .as_ref()
            .and_then(|d| d.translated_text.as_deref())
    }
}
