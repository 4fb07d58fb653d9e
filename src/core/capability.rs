//! Capability boundaries, one trait per calling convention.
//!
//! Handlers differ in arity and output shape. The dispatcher adapts each of them
//! through the trait matching its convention, so no handler ever sees arguments
//! it does not use.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::error::{CapabilityError, StoreError};

/// `(uid, prompt) -> text`. Used by textgen, thinkgen and code.
#[async_trait]
pub trait TextCapability: Send + Sync {
    async fn respond(&self, user_id: &str, prompt: &str) -> Result<String, CapabilityError>;
}

/// `(uid, prompt, url) -> text` for a single subject media item.
#[async_trait]
pub trait MediaCapability: Send + Sync {
    async fn describe(
        &self,
        user_id: &str,
        prompt: &str,
        url: &str,
    ) -> Result<String, CapabilityError>;
}

/// `(uid, prompt, urls) -> text` over every supplied image.
#[async_trait]
pub trait GalleryCapability: Send + Sync {
    async fn describe_all(
        &self,
        user_id: &str,
        prompt: &str,
        urls: &[String],
    ) -> Result<String, CapabilityError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub image_url: String,
    pub text: String,
    /// Caption shown to the user next to the image.
    pub model_response: String,
}

#[async_trait]
pub trait ImageGeneration: Send + Sync {
    async fn generate(&self, user_id: &str, prompt: &str)
    -> Result<GeneratedImage, CapabilityError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditedImage {
    pub original_url: String,
    pub edited_image_url: String,
    pub text: String,
    pub model_response: String,
}

/// Note the argument order: the source image comes before the instruction.
#[async_trait]
pub trait ImageEditing: Send + Sync {
    async fn edit(
        &self,
        user_id: &str,
        image_url: &str,
        prompt: &str,
    ) -> Result<EditedImage, CapabilityError>;
}

/// Publishes a local file and returns its public URL.
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, path: &std::path::Path) -> Result<String, CapabilityError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnPart {
    pub text: String,
}

/// One entry of a persisted conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub parts: Vec<TurnPart>,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![TurnPart { text: text.into() }],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![TurnPart { text: text.into() }],
        }
    }

    /// All parts joined, for providers that take a single text per turn.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Per-user dialogue history, append-only until cleared.
///
/// Writers for the same user are not serialized against each other.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Appends one user turn followed by one model turn.
    async fn append(&self, user_id: &str, user: &str, model: &str) -> Result<(), StoreError>;

    /// The full history, oldest first. Unknown users have an empty history.
    async fn read(&self, user_id: &str) -> Result<Vec<ConversationTurn>, StoreError>;

    /// Deletes the history. Returns whether anything existed.
    async fn clear(&self, user_id: &str) -> Result<bool, StoreError>;
}
