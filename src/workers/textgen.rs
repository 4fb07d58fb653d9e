use std::sync::Arc;

use async_trait::async_trait;

use crate::core::capability::{ConversationStore, ConversationTurn, Role, TextCapability};
use crate::core::error::CapabilityError;
use crate::llm::{GeminiClient, GeminiContent};
use crate::workers::remember;

/// History-aware chat. Serves textgen, and thinkgen when a reasoning model is configured.
#[derive(Clone)]
pub struct TextGen {
    client: GeminiClient,
    model: String,
    store: Arc<dyn ConversationStore>,
}

impl TextGen {
    pub fn new(client: GeminiClient, model: impl Into<String>, store: Arc<dyn ConversationStore>) -> Self {
        Self {
            client,
            model: model.into(),
            store,
        }
    }
}

/// Replays stored turns in the provider's content format.
pub fn history_contents(history: &[ConversationTurn]) -> Vec<GeminiContent> {
    history
        .iter()
        .map(|turn| match turn.role {
            Role::User => GeminiContent::user(turn.text()),
            Role::Model => GeminiContent::model(turn.text()),
        })
        .collect()
}

#[async_trait]
impl TextCapability for TextGen {
    async fn respond(&self, user_id: &str, prompt: &str) -> Result<String, CapabilityError> {
        let history = self.store.read(user_id).await?;
        let reply = self
            .client
            .gemini_complete(self.model.as_str(), prompt)
            .history(history_contents(&history))
            .await?;

        remember(self.store.as_ref(), user_id, prompt, &reply).await;
        Ok(reply)
    }
}
