pub mod file;
mod memory;

pub use self::file::FileConversationStore;
pub use self::memory::MemoryConversationStore;

use crate::models::chat::Message;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("conversation store IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored conversation is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value blob store holding the whole conversation for one session.
pub trait ConversationStore: Send + Sync {
    /// An absent blob loads as an empty conversation.
    fn load(&self) -> Result<Vec<Message>, StoreError>;
    fn save(&self, messages: &[Message]) -> Result<(), StoreError>;
    /// Clearing an already empty store succeeds.
    fn clear(&self) -> Result<(), StoreError>;
}

pub(crate) fn decode(blob: &str) -> Result<Vec<Message>, StoreError> {
    Ok(serde_json::from_str(blob)?)
}

pub(crate) fn encode(messages: &[Message]) -> Result<String, StoreError> {
    Ok(serde_json::to_string(messages)?)
}
