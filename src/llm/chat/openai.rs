use async_trait::async_trait;
use log::info;
use reqwest::{ Client as HttpClient, header::AUTHORIZATION };
use serde::Serialize;
use serde_json::Value as JsonValue;

use super::{ build_http_client, require_api_key, send_json, ChatClient, CompletionResponse };
use crate::llm::{ LlmConfig, LlmError, ProviderType };
use crate::models::chat::HistoryEntry;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";
const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f32 = 0.7;

pub struct OpenAIChatClient {
    http: HttpClient,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub(crate) struct OpenAIMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize, Debug)]
pub(crate) struct OpenAIChatRequest {
    pub model: String,
    pub messages: Vec<OpenAIMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

const REPLY_POINTER: &str = "/choices/0/message/content";

/// First choice's message content. Any missing or `null` step yields `None`.
pub(crate) fn extract_reply(body: &JsonValue) -> Option<String> {
    body.pointer(REPLY_POINTER).and_then(JsonValue::as_str).map(str::to_string)
}

/// System instruction first, prior turns in order, new user turn last.
pub(crate) fn build_messages(history: &[HistoryEntry], message: &str) -> Vec<OpenAIMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(OpenAIMessage {
        role: "system".to_string(),
        content: SYSTEM_PROMPT.to_string(),
    });
    messages.extend(
        history.iter().map(|entry| OpenAIMessage {
            role: entry.role.as_str().to_string(),
            content: entry.content.clone(),
        })
    );
    messages.push(OpenAIMessage {
        role: "user".to_string(),
        content: message.to_string(),
    });
    messages
}

impl OpenAIChatClient {
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

    fn completions_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/chat/completions") {
            base.to_string()
        } else {
            format!("{}/v1/chat/completions", base)
        }
    }
}

#[async_trait]
impl ChatClient for OpenAIChatClient {
    async fn complete(
        &self,
        history: &[HistoryEntry],
        message: &str
    ) -> Result<CompletionResponse, LlmError> {
        let req = OpenAIChatRequest {
            model: self.model.clone(),
            messages: build_messages(history, message),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };
        info!(
            "OpenAIChatClient::complete() → model={} turns={}",
            self.model,
            req.messages.len()
        );

        let resp: JsonValue = send_json(
            self.http
                .post(self.completions_url())
                .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
                .json(&req)
        ).await?;

        Ok(CompletionResponse::from_text(extract_reply(&resp)))
    }

    fn provider(&self) -> ProviderType {
        ProviderType::OpenAI
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> String {
        self.base_url.clone()
    }
}
