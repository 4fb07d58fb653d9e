use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use log::info;

use crate::core::capability::{ConversationStore, GeneratedImage, ImageGeneration, Uploader};
use crate::core::error::CapabilityError;
use crate::llm::{GeminiClient, GeminiContent, GeminiGenerationConfig, GeminiResponse};
use crate::workers::remember;
use crate::workers::staging::{StagedFile, staged_name};

/// Generates an image, publishes it and returns its public URL.
#[derive(Clone)]
pub struct ImageGenerator {
    client: GeminiClient,
    model: String,
    store: Arc<dyn ConversationStore>,
    uploader: Arc<dyn Uploader>,
    temp_dir: PathBuf,
}

impl ImageGenerator {
    pub fn new(
        client: GeminiClient,
        model: impl Into<String>,
        store: Arc<dyn ConversationStore>,
        uploader: Arc<dyn Uploader>,
        temp_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            store,
            uploader,
            temp_dir: temp_dir.into(),
        }
    }
}

/// Caption and decoded image bytes from an image-model response.
pub(crate) fn image_output(response: &GeminiResponse) -> Result<(String, Vec<u8>), CapabilityError> {
    let data = response.last_inline_data().ok_or(CapabilityError::NoImage)?;
    let image = data.decode()?;
    let caption = response.last_text().unwrap_or_default().to_string();
    Ok((caption, image))
}

#[async_trait]
impl ImageGeneration for ImageGenerator {
    async fn generate(&self, user_id: &str, prompt: &str) -> Result<GeneratedImage, CapabilityError> {
        let response = self
            .client
            .call_gemini(
                self.model.as_str(),
                vec![GeminiContent::user(prompt)],
                None,
                Some(GeminiGenerationConfig::text_and_image()),
                Vec::new(),
            )
            .await?;
        let (text, image) = image_output(&response)?;

        let staged = StagedFile::write(&self.temp_dir, &staged_name("", user_id), &image)
            .await
            .map_err(|e| CapabilityError::Other(format!("could not stage image: {e}")))?;
        let image_url = self.uploader.upload(staged.path()).await?;
        info!("[{}] generated image at {}", user_id, image_url);

        let model_response = format!("Here's ai generated image of your prompt: {image_url}");
        remember(self.store.as_ref(), user_id, prompt, &model_response).await;

        Ok(GeneratedImage {
            image_url,
            text,
            model_response,
        })
    }
}
