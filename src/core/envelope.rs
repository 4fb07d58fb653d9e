use serde::{Deserialize, Serialize};

use crate::core::error::RouteError;

/// Kind of payload carried by an [`Envelope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeType {
    Text,
    Image,
    Code,
    Error,
}

/// The one result shape every caller sees, whichever worker produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub success: bool,
    #[serde(rename = "type")]
    pub kind: EnvelopeType,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
}

impl Envelope {
    fn new(success: bool, kind: EnvelopeType, message: impl Into<String>) -> Self {
        Self {
            success,
            kind,
            message: message.into(),
            image_url: None,
            edited_image_url: None,
            original_url: None,
        }
    }

    pub fn text(message: impl Into<String>) -> Self {
        Self::new(true, EnvelopeType::Text, message)
    }

    pub fn code(message: impl Into<String>) -> Self {
        Self::new(true, EnvelopeType::Code, message)
    }

    /// A freshly generated image.
    pub fn generated_image(message: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            image_url: Some(image_url.into()),
            ..Self::new(true, EnvelopeType::Image, message)
        }
    }

    /// An edited image, together with the image it was derived from.
    pub fn edited_image(
        message: impl Into<String>,
        original_url: impl Into<String>,
        edited_image_url: impl Into<String>,
    ) -> Self {
        Self {
            original_url: Some(original_url.into()),
            edited_image_url: Some(edited_image_url.into()),
            ..Self::new(true, EnvelopeType::Image, message)
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(false, EnvelopeType::Error, message)
    }

    /// The image a renderer should show, if any. Generated images win over edits.
    pub fn display_image(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .or(self.edited_image_url.as_deref())
    }
}

impl From<RouteError> for Envelope {
    fn from(err: RouteError) -> Self {
        Envelope::failure(err.to_string())
    }
}
