pub mod http;

pub use self::http::HttpRelayClient;

use async_trait::async_trait;
use log::{ error, info, warn };
use std::sync::{ Arc, Mutex, MutexGuard };
use thiserror::Error;

use crate::history::ConversationStore;
use crate::models::chat::{ to_history, ChatRequest, ChatResponse, Message, Role };

pub const SEND_ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("relay returned HTTP {0}")]
    Status(u16),

    #[error("relay request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Carries one chat request to the relay endpoint.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input, or another send was still in flight.
    Skipped,
    Delivered,
    /// The relay call failed and the apology turn was appended instead.
    Failed,
}

#[derive(Default)]
struct SessionState {
    messages: Vec<Message>,
    loading: bool,
}

/// Owns the conversation for one session and mirrors every change to its store.
///
/// Share it behind an `Arc`; state is only mutated through `send` and `clear`.
/// The internal lock is never held across the relay call.
pub struct ChatSession {
    state: Mutex<SessionState>,
    store: Arc<dyn ConversationStore>,
    relay: Arc<dyn RelayTransport>,
}

impl ChatSession {
    /// Seeds the conversation from the store. Unreadable history starts empty.
    pub fn restore(store: Arc<dyn ConversationStore>, relay: Arc<dyn RelayTransport>) -> Self {
        let messages = match store.load() {
            Ok(messages) => messages,
            Err(e) => {
                error!("Failed to parse saved messages: {}", e);
                Vec::new()
            }
        };
        info!("Restored conversation with {} message(s)", messages.len());
        Self {
            state: Mutex::new(SessionState { messages, loading: false }),
            store,
            relay,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    pub fn message_count(&self) -> usize {
        self.lock().messages.len()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub async fn send(&self, text: &str) -> SendOutcome {
        let request = {
            let mut state = self.lock();
            if text.trim().is_empty() || state.loading {
                return SendOutcome::Skipped;
            }

            let user_message = Message::new(text, Role::User);
            let request = ChatRequest {
                message: user_message.text.clone(),
                conversation_history: to_history(&state.messages),
            };
            state.messages.push(user_message);
            state.loading = true;
            self.persist(&state.messages);
            request
        };

        let result = self.relay.send(&request).await;

        let mut state = self.lock();
        let outcome = match result {
            Ok(reply) if reply.message.trim().is_empty() => {
                warn!("Relay answered with an empty message");
                state.messages.push(Message::new(SEND_ERROR_REPLY, Role::Assistant));
                SendOutcome::Failed
            }
            Ok(reply) => {
                state.messages.push(Message::new(&reply.message, Role::Assistant));
                SendOutcome::Delivered
            }
            Err(e) => {
                error!("Error sending message: {}", e);
                state.messages.push(Message::new(SEND_ERROR_REPLY, Role::Assistant));
                SendOutcome::Failed
            }
        };
        state.loading = false;
        self.persist(&state.messages);
        outcome
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.messages.clear();
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear messages: {}", e);
        }
    }

    // Called with the state lock held so saves land in mutation order. The store
    // call is synchronous and runs on the current runtime thread.
    fn persist(&self, messages: &[Message]) {
        if let Err(e) = self.store.save(messages) {
            warn!("Failed to save messages: {}", e);
        }
    }
}
