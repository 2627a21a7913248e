use std::fs;
use std::io::ErrorKind;
use std::path::{ Path, PathBuf };

use log::debug;

use super::{ decode, encode, ConversationStore, StoreError };
use crate::models::chat::Message;

pub const DEFAULT_HISTORY_PATH: &str = "chat_history.json";

/// Persists the conversation as one JSON array in a single file.
pub struct FileConversationStore {
    path: PathBuf,
}

impl FileConversationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConversationStore for FileConversationStore {
    fn load(&self) -> Result<Vec<Message>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => decode(&blob),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, messages: &[Message]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, encode(messages)?)?;
        debug!("Saved {} message(s) to {}", messages.len(), self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
