use std::sync::Arc;

use crate::core::capability::{
    ConversationStore, GalleryCapability, ImageEditing, ImageGeneration, MediaCapability,
    TextCapability,
};
use crate::core::worker::Worker;

/// The fixed set of handlers, built once at startup and shared by `Arc`.
///
/// An empty slot means the capability failed to initialize; the dispatcher
/// reports it as unavailable (or, for thinkgen, reroutes to textgen).
#[derive(Clone, Default)]
pub struct CapabilityRegistry {
    pub(crate) textgen: Option<Arc<dyn TextCapability>>,
    pub(crate) thinkgen: Option<Arc<dyn TextCapability>>,
    pub(crate) code: Option<Arc<dyn TextCapability>>,
    pub(crate) audio: Option<Arc<dyn MediaCapability>>,
    pub(crate) vision: Option<Arc<dyn GalleryCapability>>,
    pub(crate) video: Option<Arc<dyn MediaCapability>>,
    pub(crate) youtube: Option<Arc<dyn MediaCapability>>,
    pub(crate) image_generation: Option<Arc<dyn ImageGeneration>>,
    pub(crate) image_editing: Option<Arc<dyn ImageEditing>>,
    pub(crate) store: Option<Arc<dyn ConversationStore>>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_textgen(mut self, capability: Arc<dyn TextCapability>) -> Self {
        self.textgen = Some(capability);
        self
    }

    pub fn with_thinkgen(mut self, capability: Arc<dyn TextCapability>) -> Self {
        self.thinkgen = Some(capability);
        self
    }

    pub fn with_code(mut self, capability: Arc<dyn TextCapability>) -> Self {
        self.code = Some(capability);
        self
    }

    pub fn with_audio(mut self, capability: Arc<dyn MediaCapability>) -> Self {
        self.audio = Some(capability);
        self
    }

    pub fn with_vision(mut self, capability: Arc<dyn GalleryCapability>) -> Self {
        self.vision = Some(capability);
        self
    }

    pub fn with_video(mut self, capability: Arc<dyn MediaCapability>) -> Self {
        self.video = Some(capability);
        self
    }

    pub fn with_youtube(mut self, capability: Arc<dyn MediaCapability>) -> Self {
        self.youtube = Some(capability);
        self
    }

    pub fn with_image_generation(mut self, capability: Arc<dyn ImageGeneration>) -> Self {
        self.image_generation = Some(capability);
        self
    }

    pub fn with_image_editing(mut self, capability: Arc<dyn ImageEditing>) -> Self {
        self.image_editing = Some(capability);
        self
    }

    /// The store backing `clear`.
    pub fn with_store(mut self, store: Arc<dyn ConversationStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Whether a handler is configured for `worker`. thinkgen counts as
    /// available whenever textgen is, since it falls back to it.
    pub fn is_available(&self, worker: Worker) -> bool {
        match worker {
            Worker::TextGen => self.textgen.is_some(),
            Worker::ThinkGen => self.thinkgen.is_some() || self.textgen.is_some(),
            Worker::Code => self.code.is_some(),
            Worker::AudioToText => self.audio.is_some(),
            Worker::ImageToText => self.vision.is_some(),
            Worker::VideoToText => self.video.is_some(),
            Worker::YouTubeToText => self.youtube.is_some(),
            Worker::GenerateImage => self.image_generation.is_some(),
            Worker::EditImage => self.image_editing.is_some(),
            Worker::Clear => self.store.is_some(),
        }
    }

    /// Workers that currently have a handler, in routing order.
    pub fn available_workers(&self) -> Vec<Worker> {
        Worker::ALL
            .into_iter()
            .filter(|w| self.is_available(*w))
            .collect()
    }
}
