use async_trait::async_trait;
use log::info;
use reqwest::Client as HttpClient;
use serde::Serialize;
use serde_json::Value as JsonValue;

use super::{ build_http_client, require_api_key, send_json, ChatClient, CompletionResponse };
use crate::llm::{ LlmConfig, LlmError, ProviderType };
use crate::models::chat::HistoryEntry;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_KEY_HEADER: &str = "X-goog-api-key";

#[derive(Serialize, Debug)]
pub(crate) struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
}

#[derive(Serialize, Debug)]
pub(crate) struct GeminiContent {
    pub parts: Vec<GeminiPart>,
}

#[derive(Serialize, Debug)]
pub(crate) struct GeminiPart {
    pub text: String,
}

const REPLY_POINTER: &str = "/candidates/0/content/parts/0/text";

/// First candidate's first text part. Any missing or `null` step yields `None`.
pub(crate) fn extract_reply(body: &JsonValue) -> Option<String> {
    body.pointer(REPLY_POINTER).and_then(JsonValue::as_str).map(str::to_string)
}

/// Renders every turn as `<role>: <content>` and joins them with newlines.
pub(crate) fn build_prompt(history: &[HistoryEntry], message: &str) -> String {
    history
        .iter()
        .map(|entry| format!("{}: {}", entry.role, entry.content))
        .chain(std::iter::once(format!("user: {}", message)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct GeminiChatClient {
    http: HttpClient,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiChatClient {
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
        http: HttpClient
    ) -> Self {
        Self {
            http,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = require_api_key(config)?;
        let http = build_http_client(config.timeout)?;
        Ok(Self::new(api_key, config.model.clone(), config.base_url.clone(), http))
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl ChatClient for GeminiChatClient {
    async fn complete(
        &self,
        history: &[HistoryEntry],
        message: &str
    ) -> Result<CompletionResponse, LlmError> {
        info!(
            "GeminiChatClient::complete() → model={} base_url={}",
            self.model,
            self.base_url
        );

        let payload = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: build_prompt(history, message),
                }],
            }],
        };

        let resp: JsonValue = send_json(
            self.http
                .post(self.generate_url())
                .header(API_KEY_HEADER, &self.api_key)
                .json(&payload)
        ).await?;

        Ok(CompletionResponse::from_text(extract_reply(&resp)))
    }

    fn provider(&self) -> ProviderType {
        ProviderType::Gemini
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> String {
        self.base_url.clone()
    }
}
