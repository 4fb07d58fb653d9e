use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;

use crate::core::capability::{ConversationStore, GalleryCapability};
use crate::core::error::CapabilityError;
use crate::llm::{GeminiClient, GeminiPart};
use crate::workers::media::{self, MediaKind};
use crate::workers::{ask, remember};

/// Answers questions about one or more images at once.
#[derive(Clone)]
pub struct ImageDescriber {
    client: GeminiClient,
    model: String,
    store: Arc<dyn ConversationStore>,
}

impl ImageDescriber {
    pub fn new(client: GeminiClient, model: impl Into<String>, store: Arc<dyn ConversationStore>) -> Self {
        Self {
            client,
            model: model.into(),
            store,
        }
    }
}

#[async_trait]
impl GalleryCapability for ImageDescriber {
    async fn describe_all(
        &self,
        user_id: &str,
        prompt: &str,
        urls: &[String],
    ) -> Result<String, CapabilityError> {
        let images = try_join_all(
            urls.iter()
                .map(|url| media::fetch(&self.client, MediaKind::Image, url)),
        )
        .await?;

        let mut parts: Vec<GeminiPart> = images
            .iter()
            .map(|image| GeminiPart::inline(image.to_inline()))
            .collect();
        parts.push(GeminiPart::text(prompt));

        let reply = ask(&self.client, &self.model, parts).await?;
        remember(
            self.store.as_ref(),
            user_id,
            &format!("{} : {}", prompt, urls.join(" and ")),
            &reply,
        )
        .await;
        Ok(reply)
    }
}
