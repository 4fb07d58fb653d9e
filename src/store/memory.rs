use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::core::capability::{ConversationStore, ConversationTurn};
use crate::core::error::StoreError;

/// Simple in-memory store, handy for tests and short-lived processes.
#[derive(Debug, Default)]
pub struct MemoryConversationStore {
    conversations: Mutex<HashMap<String, Vec<ConversationTurn>>>,
}

impl MemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with a non-empty history.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<ConversationTurn>>> {
        self.conversations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn append(&self, user_id: &str, user: &str, model: &str) -> Result<(), StoreError> {
        let mut conversations = self.lock();
        let history = conversations.entry(user_id.to_string()).or_default();
        history.push(ConversationTurn::user(user));
        history.push(ConversationTurn::model(model));
        Ok(())
    }

    async fn read(&self, user_id: &str) -> Result<Vec<ConversationTurn>, StoreError> {
        Ok(self.lock().get(user_id).cloned().unwrap_or_default())
    }

    async fn clear(&self, user_id: &str) -> Result<bool, StoreError> {
        Ok(self.lock().remove(user_id).is_some())
    }
}
