pub mod error;
pub mod validation;

use log::{ error, info, warn };
use std::sync::Arc;

use crate::llm::chat::{ new_client, ChatClient, CompletionResponse };
use crate::llm::{ LlmConfig, LlmError, ProviderType };
use crate::models::chat::{ ChatRequest, ChatResponse };
use self::error::RelayError;

pub const FALLBACK_REPLY: &str = "I apologize, but I cannot generate a response at the moment.";

/// Stateless relay between the chat route and the configured provider strategy.
pub struct Relay {
    provider: ProviderType,
    client: Option<Arc<dyn ChatClient>>,
}

impl Relay {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self {
            provider: client.provider(),
            client: Some(client),
        }
    }

    /// A relay with no credential. Every call answers with a configuration error.
    pub fn unconfigured(provider: ProviderType) -> Self {
        Self { provider, client: None }
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        match new_client(config) {
            Ok(client) => {
                info!(
                    "Chat client configured: Type={}, Model={}, BaseURL={}",
                    config.provider,
                    client.get_model(),
                    client.get_base_url()
                );
                Ok(Self::new(client))
            }
            Err(LlmError::MissingApiKey(provider)) => {
                warn!(
                    "No API key for {} (set CHAT_API_KEY or {}). Chat requests will fail until configured.",
                    provider,
                    provider.key_env_var()
                );
                Ok(Self::unconfigured(provider))
            }
            Err(e) => Err(e),
        }
    }

    pub fn provider(&self) -> ProviderType {
        self.provider
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Validates a raw body and relays it.
    pub async fn handle_body(&self, body: &[u8]) -> Result<ChatResponse, RelayError> {
        let request = validation::parse_request(body).map_err(|violations| {
            warn!("Rejected chat request: {:?}", violations);
            RelayError::Validation(violations)
        })?;
        self.relay(&request).await
    }

    /// Forwards an already validated request with exactly one upstream call.
    pub async fn relay(&self, request: &ChatRequest) -> Result<ChatResponse, RelayError> {
        let client = self.client
            .as_ref()
            .ok_or_else(|| RelayError::from(LlmError::MissingApiKey(self.provider)))?;

        match client.complete(&request.conversation_history, &request.message).await {
            Ok(completion) => Ok(into_chat_response(completion)),
            Err(LlmError::Status { status, payload }) => {
                error!("{} API error details ({}): {}", self.provider.display_name(), status, payload);
                Err(RelayError::Upstream { status, payload })
            }
            Err(e) => {
                error!("Chat API error: {}", e);
                Err(e.into())
            }
        }
    }
}

fn into_chat_response(completion: CompletionResponse) -> ChatResponse {
    let message = completion.response.unwrap_or_else(|| {
        warn!("Provider response had no completion text; using fallback reply");
        FALLBACK_REPLY.to_string()
    });
    ChatResponse { message }
}
