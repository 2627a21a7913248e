use std::sync::Mutex;

use super::{ decode, encode, ConversationStore, StoreError };
use crate::models::chat::Message;

/// Holds the serialized conversation in memory, so loading still goes through
/// the same decode path as the file store.
#[derive(Default)]
pub struct MemoryConversationStore {
    blob: Mutex<Option<String>>,
}

impl MemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(blob.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.blob.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

impl ConversationStore for MemoryConversationStore {
    fn load(&self) -> Result<Vec<Message>, StoreError> {
        match self.raw() {
            Some(blob) => decode(&blob),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, messages: &[Message]) -> Result<(), StoreError> {
        let blob = encode(messages)?;
        *self.blob.lock().unwrap_or_else(|p| p.into_inner()) = Some(blob);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.blob.lock().unwrap_or_else(|p| p.into_inner()) = None;
        Ok(())
    }
}
