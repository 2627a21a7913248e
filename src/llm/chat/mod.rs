pub mod openai;
pub mod gemini;

use async_trait::async_trait;
use log::debug;
use reqwest::{ Client as HttpClient, RequestBuilder };
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;
use super::{ LlmConfig, LlmError, ProviderType };
use self::openai::OpenAIChatClient;
use self::gemini::GeminiChatClient;
use crate::models::chat::HistoryEntry;

/// Reply extracted from a provider response. `None` when the provider answered
/// successfully but the expected text field was absent or blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    pub response: Option<String>,
}

impl CompletionResponse {
    pub fn from_text(text: Option<String>) -> Self {
        Self {
            response: text.filter(|t| !t.trim().is_empty()),
        }
    }
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(
        &self,
        history: &[HistoryEntry],
        message: &str
    ) -> Result<CompletionResponse, LlmError>;

    fn provider(&self) -> ProviderType;
    fn get_model(&self) -> String;
    fn get_base_url(&self) -> String;
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn ChatClient>, LlmError> {
    let client: Arc<dyn ChatClient> = match config.provider {
        ProviderType::OpenAI => {
            let specific_client = OpenAIChatClient::from_config(config)?;
            Arc::new(specific_client)
        }
        ProviderType::Gemini => {
            let specific_client = GeminiChatClient::from_config(config)?;
            Arc::new(specific_client)
        }
    };
    Ok(client)
}

pub(crate) fn require_api_key(config: &LlmConfig) -> Result<String, LlmError> {
    config.api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .ok_or(LlmError::MissingApiKey(config.provider))
}

pub(crate) fn build_http_client(timeout: Duration) -> Result<HttpClient, LlmError> {
    Ok(HttpClient::builder().timeout(timeout).build()?)
}

/// Sends a prepared request and decodes a success body. A non-success status is
/// returned as `LlmError::Status` carrying the provider's error payload, parsed as
/// JSON when possible and as a plain string otherwise.
pub(crate) async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, LlmError> {
    let resp = request.send().await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        debug!("Provider error body ({}): {}", status, body);
        let payload = serde_json::from_str::<JsonValue>(&body).unwrap_or(JsonValue::String(body));
        return Err(LlmError::Status {
            status: status.as_u16(),
            payload,
        });
    }
    Ok(resp.json::<T>().await?)
}
