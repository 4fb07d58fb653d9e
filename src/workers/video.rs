use std::sync::Arc;

use async_trait::async_trait;

use crate::core::capability::{ConversationStore, MediaCapability};
use crate::core::error::CapabilityError;
use crate::llm::{GeminiClient, GeminiPart};
use crate::workers::media::{self, MediaKind};
use crate::workers::{ask, remember};

/// Describes a regular video file, sent inline.
#[derive(Clone)]
pub struct VideoDescriber {
    client: GeminiClient,
    model: String,
    store: Arc<dyn ConversationStore>,
}

impl VideoDescriber {
    pub fn new(client: GeminiClient, model: impl Into<String>, store: Arc<dyn ConversationStore>) -> Self {
        Self {
            client,
            model: model.into(),
            store,
        }
    }
}

#[async_trait]
impl MediaCapability for VideoDescriber {
    async fn describe(&self, user_id: &str, prompt: &str, url: &str) -> Result<String, CapabilityError> {
        let video = media::fetch(&self.client, MediaKind::Video, url).await?;
        let reply = ask(
            &self.client,
            &self.model,
            vec![GeminiPart::inline(video.to_inline()), GeminiPart::text(prompt)],
        )
        .await?;

        remember(self.store.as_ref(), user_id, &format!("{prompt} : {url}"), &reply).await;
        Ok(reply)
    }
}

/// Describes a YouTube video. The provider fetches it by URI; nothing is downloaded here.
#[derive(Clone)]
pub struct YouTubeDescriber {
    client: GeminiClient,
    model: String,
    store: Arc<dyn ConversationStore>,
}

impl YouTubeDescriber {
    pub fn new(client: GeminiClient, model: impl Into<String>, store: Arc<dyn ConversationStore>) -> Self {
        Self {
            client,
            model: model.into(),
            store,
        }
    }
}

#[async_trait]
impl MediaCapability for YouTubeDescriber {
    async fn describe(&self, user_id: &str, prompt: &str, url: &str) -> Result<String, CapabilityError> {
        let reply = ask(
            &self.client,
            &self.model,
            vec![GeminiPart::text(prompt), GeminiPart::file_uri(url)],
        )
        .await?;

        remember(self.store.as_ref(), user_id, &format!("{prompt} : {url}"), &reply).await;
        Ok(reply)
    }
}
