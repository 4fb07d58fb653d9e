use std::sync::Arc;

use async_trait::async_trait;

use crate::core::capability::{ConversationStore, MediaCapability};
use crate::core::error::CapabilityError;
use crate::llm::{GeminiClient, GeminiPart};
use crate::workers::media::{self, MediaKind};
use crate::workers::{ask, remember};

/// Used when the user sends a clip without saying what they want.
pub const DEFAULT_AUDIO_PROMPT: &str = "Describe the content of this audio";

/// Transcribes or answers questions about an audio clip.
#[derive(Clone)]
pub struct AudioTranscriber {
    client: GeminiClient,
    model: String,
    store: Arc<dyn ConversationStore>,
}

impl AudioTranscriber {
    pub fn new(client: GeminiClient, model: impl Into<String>, store: Arc<dyn ConversationStore>) -> Self {
        Self {
            client,
            model: model.into(),
            store,
        }
    }
}

#[async_trait]
impl MediaCapability for AudioTranscriber {
    async fn describe(&self, user_id: &str, prompt: &str, url: &str) -> Result<String, CapabilityError> {
        let audio = media::fetch(&self.client, MediaKind::Audio, url).await?;
        let instruction = if prompt.trim().is_empty() {
            DEFAULT_AUDIO_PROMPT
        } else {
            prompt
        };

        let reply = ask(
            &self.client,
            &self.model,
            vec![GeminiPart::text(instruction), GeminiPart::inline(audio.to_inline())],
        )
        .await?;

        remember(self.store.as_ref(), user_id, &format!("{prompt} : {url}"), &reply).await;
        Ok(reply)
    }
}
