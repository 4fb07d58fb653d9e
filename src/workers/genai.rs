use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use log::info;

use crate::core::capability::{ConversationStore, EditedImage, ImageEditing, Uploader};
use crate::core::error::CapabilityError;
use crate::llm::{GeminiClient, GeminiContent, GeminiGenerationConfig, GeminiPart, InlineData};
use crate::workers::genimg::image_output;
use crate::workers::media::{self, MediaKind};
use crate::workers::remember;
use crate::workers::staging::{StagedFile, staged_name};

/// Edits an existing image following a text instruction.
#[derive(Clone)]
pub struct ImageEditor {
    client: GeminiClient,
    model: String,
    store: Arc<dyn ConversationStore>,
    uploader: Arc<dyn Uploader>,
    temp_dir: PathBuf,
}

impl ImageEditor {
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

#[async_trait]
impl ImageEditing for ImageEditor {
    async fn edit(
        &self,
        user_id: &str,
        image_url: &str,
        prompt: &str,
    ) -> Result<EditedImage, CapabilityError> {
        let source = media::fetch(&self.client, MediaKind::Image, image_url).await?;
        // Edits are always sent as PNG whatever the source format
        let png = media::to_png(&source.bytes)?;

        let response = self
            .client
            .call_gemini(
                self.model.as_str(),
                vec![GeminiContent::user_parts(vec![
                    GeminiPart::text(prompt),
                    GeminiPart::inline(InlineData::from_bytes("image/png", &png)),
                ])],
                None,
                Some(GeminiGenerationConfig::text_and_image()),
                Vec::new(),
            )
            .await?;
        let (text, image) = image_output(&response)?;

        let staged = StagedFile::write(&self.temp_dir, &staged_name("edited_", user_id), &image)
            .await
            .map_err(|e| CapabilityError::Other(format!("could not stage image: {e}")))?;
        let edited_image_url = self.uploader.upload(staged.path()).await?;
        info!("[{}] edited {} into {}", user_id, image_url, edited_image_url);

        let model_response = format!("Here's the edited image: {edited_image_url}");
        remember(
            self.store.as_ref(),
            user_id,
            &format!("Edit this image: {image_url} with prompt: {prompt}"),
            &model_response,
        )
        .await;

        Ok(EditedImage {
            original_url: image_url.to_string(),
            edited_image_url,
            text,
            model_response,
        })
    }
}
