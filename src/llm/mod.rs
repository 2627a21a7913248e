pub mod chat;
use serde::{ Deserialize, Serialize };
use std::str::FromStr;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    OpenAI,
    Gemini,
}

impl ProviderType {
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderType::OpenAI => "OpenAI",
            ProviderType::Gemini => "Gemini",
        }
    }

    /// Provider-specific variable consulted when no generic key is configured.
    pub fn key_env_var(&self) -> &'static str {
        match self {
            ProviderType::OpenAI => "OPENAI_API_KEY",
            ProviderType::Gemini => "GEMINI_API_KEY",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderType::OpenAI => write!(f, "openai"),
            ProviderType::Gemini => write!(f, "gemini"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseProviderTypeError {
    message: String,
}

impl fmt::Display for ParseProviderTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseProviderTypeError {}

impl FromStr for ProviderType {
    type Err = ParseProviderTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderType::OpenAI),
            "gemini" => Ok(ProviderType::Gemini),
            _ =>
                Err(ParseProviderTypeError {
                    message: format!("Invalid LLM type: '{}' (expected openai or gemini)", s),
                }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: ProviderType,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderType::Gemini,
            api_key: None,
            model: None,
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl LlmConfig {
    /// Fills an empty `api_key` from the provider-specific environment variable.
    pub fn with_env_fallback(mut self) -> Self {
        let configured = self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty());
        if configured.is_none() {
            self.api_key = std::env
                ::var(self.provider.key_env_var())
                .ok()
                .filter(|k| !k.trim().is_empty());
        }
        self
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{} API key not configured.", .0.display_name())]
    MissingApiKey(ProviderType),

    #[error("provider returned status {status}")]
    Status {
        status: u16,
        payload: serde_json::Value,
    },

    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
}
