//! Gemini-backed capability handlers and the registry wiring for them.

pub mod audio;
pub mod code;
pub mod genai;
pub mod genimg;
pub mod media;
pub mod staging;
pub mod textgen;
pub mod upload;
pub mod video;
pub mod vision;

use std::sync::Arc;

use log::warn;

pub use audio::AudioTranscriber;
pub use code::CodeAssist;
pub use genai::ImageEditor;
pub use genimg::ImageGenerator;
pub use textgen::TextGen;
pub use upload::UguuUploader;
pub use video::{VideoDescriber, YouTubeDescriber};
pub use vision::ImageDescriber;

use crate::config::Settings;
use crate::core::capability::{ConversationStore, Uploader};
use crate::core::dispatch::Dispatcher;
use crate::core::error::CapabilityError;
use crate::core::registry::CapabilityRegistry;
use crate::llm::{Client, GeminiClient, GeminiContent, GeminiOracle, GeminiPart};
use crate::store::FileConversationStore;

/// Single-turn request with the given parts; returns the first text part.
pub(crate) async fn ask(
    client: &GeminiClient,
    model: &str,
    parts: Vec<GeminiPart>,
) -> Result<String, CapabilityError> {
    let response = client
        .call_gemini(model, vec![GeminiContent::user_parts(parts)], None, None, Vec::new())
        .await?;
    Ok(response.first_text()?)
}

/// Records an exchange. A failed write never fails the request that produced it.
pub(crate) async fn remember(store: &dyn ConversationStore, user_id: &str, user: &str, model: &str) {
    if let Err(err) = store.append(user_id, user, model).await {
        warn!("[{}] could not store conversation: {}", user_id, err);
    }
}

/// Every Gemini-backed handler, sharing one HTTP client and one store.
///
/// thinkgen is only registered when a reasoning model is configured.
pub fn build_registry(
    settings: &Settings,
    client: &GeminiClient,
    store: Arc<dyn ConversationStore>,
) -> CapabilityRegistry {
    let chat = settings.chat_model.as_str();
    let uploader: Arc<dyn Uploader> = Arc::new(UguuUploader::new(
        reqwest::Client::clone(client),
        settings.upload_url.clone(),
    ));

    let mut registry = CapabilityRegistry::new()
        .with_textgen(Arc::new(TextGen::new(client.clone(), chat, store.clone())))
        .with_code(Arc::new(CodeAssist::new(client.clone(), chat, store.clone())))
        .with_audio(Arc::new(AudioTranscriber::new(client.clone(), chat, store.clone())))
        .with_vision(Arc::new(ImageDescriber::new(client.clone(), chat, store.clone())))
        .with_video(Arc::new(VideoDescriber::new(client.clone(), chat, store.clone())))
        .with_youtube(Arc::new(YouTubeDescriber::new(client.clone(), chat, store.clone())))
        .with_image_generation(Arc::new(ImageGenerator::new(
            client.clone(),
            settings.image_model.as_str(),
            store.clone(),
            uploader.clone(),
            settings.temp_dir.clone(),
        )))
        .with_image_editing(Arc::new(ImageEditor::new(
            client.clone(),
            settings.image_model.as_str(),
            store.clone(),
            uploader,
            settings.temp_dir.clone(),
        )));

    if let Some(thinking_model) = settings.thinking_model.as_deref() {
        registry = registry.with_thinkgen(Arc::new(TextGen::new(
            client.clone(),
            thinking_model,
            store.clone(),
        )));
    }
    registry.with_store(store)
}

/// Builds the full dispatcher from settings: Gemini oracle, file-backed history
/// and every handler.
pub fn build_dispatcher(settings: &Settings) -> Dispatcher {
    let client = Client::new().with_gemini_at(settings.api_key.clone(), settings.base_url.clone());
    let store: Arc<dyn ConversationStore> =
        Arc::new(FileConversationStore::new(settings.data_dir.clone()));
    let registry = build_registry(settings, &client, store);
    let oracle = GeminiOracle::new(client, settings.router_model.clone());
    Dispatcher::new(Arc::new(oracle), Arc::new(registry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::worker::Worker;
    use crate::store::MemoryConversationStore;

    fn settings(thinking_model: Option<&str>) -> Settings {
        let thinking_model = thinking_model.map(str::to_string);
        Settings::from_lookup(|key| match key {
            "GEMINI_API_KEY" => Some("test-key".to_string()),
            "THINKING_MODEL" => thinking_model.clone(),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn test_registry_without_thinking_model() {
        let client = Client::new().with_gemini("test-key");
        let registry = build_registry(
            &settings(None),
            &client,
            Arc::new(MemoryConversationStore::new()),
        );
        assert_eq!(registry.available_workers(), Worker::ALL.to_vec());
        assert!(registry.thinkgen.is_none());
    }

    #[test]
    fn test_registry_with_thinking_model() {
        let client = Client::new().with_gemini("test-key");
        let registry = build_registry(
            &settings(Some("gemini-2.5-pro")),
            &client,
            Arc::new(MemoryConversationStore::new()),
        );
        assert!(registry.thinkgen.is_some());
    }
}
