//! Google Gemini client
//!
//! Covers the parts of `generateContent` the workers need: multi-turn text,
//! inline media, file URIs, the code execution tool and image output.

use std::future::IntoFuture;
use std::pin::Pin;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::llm::{Client, HasProvider, error::LLMError};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Marker type for Gemini provider
pub struct Gemini;

/// Configuration for Gemini client
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    /// API key for authentication
    pub api_key: String,
    /// Base URL (default: https://generativelanguage.googleapis.com)
    pub base_url: String,
}

/// Request structure for Gemini generate content
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiGenerationConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<GeminiTool>,
}

/// Content structure for Gemini
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

/// A part of content. Exactly one field is set on well-formed parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_data: Option<FileData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable_code: Option<ExecutableCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_execution_result: Option<CodeExecutionResult>,
}

/// Base64-encoded bytes sent or received inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl InlineData {
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    pub fn decode(&self) -> Result<Vec<u8>, LLMError> {
        STANDARD
            .decode(self.data.as_bytes())
            .map_err(|e| LLMError::InvalidResponse(format!("inline data is not base64: {e}")))
    }
}

/// A remote file referenced by URI (e.g. a YouTube link).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub file_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutableCode {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeExecutionResult {
    #[serde(default)]
    pub outcome: String,
    #[serde(default)]
    pub output: String,
}

impl GeminiPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn inline(data: InlineData) -> Self {
        Self {
            inline_data: Some(data),
            ..Default::default()
        }
    }

    pub fn file_uri(uri: impl Into<String>) -> Self {
        Self {
            file_data: Some(FileData {
                mime_type: None,
                file_uri: uri.into(),
            }),
            ..Default::default()
        }
    }
}

impl GeminiContent {
    pub fn user(text: impl Into<String>) -> Self {
        Self::user_parts(vec![GeminiPart::text(text)])
    }

    pub fn user_parts(parts: Vec<GeminiPart>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts,
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Some("model".to_string()),
            parts: vec![GeminiPart::text(text)],
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: None, // System instructions don't have a role
            parts: vec![GeminiPart::text(text)],
        }
    }
}

/// Tool declaration. Only server-side code execution is used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiTool {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_execution: Option<serde_json::Map<String, serde_json::Value>>,
}

impl GeminiTool {
    pub fn code_execution() -> Self {
        Self {
            code_execution: Some(serde_json::Map::new()),
        }
    }
}

/// Generation configuration for Gemini. Only output modalities are set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    /// e.g. `["Text", "Image"]` for the image model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
}

impl GeminiGenerationConfig {
    /// Asks for both a caption and an image.
    pub fn text_and_image() -> Self {
        Self {
            response_modalities: Some(vec!["Text".to_string(), "Image".to_string()]),
        }
    }
}

/// Response from Gemini generate content
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: GeminiContent,
    pub finish_reason: Option<String>,
}

impl GeminiResponse {
    /// Parts of the first candidate.
    pub fn parts(&self) -> &[GeminiPart] {
        self.candidates
            .first()
            .map(|c| c.content.parts.as_slice())
            .unwrap_or_default()
    }

    /// Text of the first part of the first candidate.
    pub fn first_text(&self) -> Result<String, LLMError> {
        self.parts()
            .first()
            .and_then(|p| p.text.clone())
            .ok_or_else(|| LLMError::InvalidResponse("No text in response".to_string()))
    }

    /// The last text part, if any. Image models put their caption there.
    pub fn last_text(&self) -> Option<&str> {
        self.parts().iter().rev().find_map(|p| p.text.as_deref())
    }

    /// The last inline payload, if any.
    pub fn last_inline_data(&self) -> Option<&InlineData> {
        self.parts()
            .iter()
            .rev()
            .find_map(|p| p.inline_data.as_ref())
    }
}

/// Builder for Gemini content generation
pub struct GeminiCompletionBuilder<'a, S> {
    client: &'a Client<S>,
    model: String,
    system_prompt: Option<String>,
    history: Vec<GeminiContent>,
    user_parts: Vec<GeminiPart>,
}

impl<'a, S> GeminiCompletionBuilder<'a, S>
where
    S: HasProvider<Gemini> + Send + Sync + 'static,
{
    pub fn new(client: &'a Client<S>, model: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            system_prompt: None,
            history: Vec::new(),
            user_parts: vec![GeminiPart::text(user_prompt)],
        }
    }

    pub fn system(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    /// Earlier turns sent before the user message.
    pub fn history(mut self, history: Vec<GeminiContent>) -> Self {
        self.history = history;
        self
    }
}

impl<'a, S> IntoFuture for GeminiCompletionBuilder<'a, S>
where
    S: HasProvider<Gemini> + Send + Sync + Clone + 'static,
{
    type Output = Result<String, LLMError>;
    type IntoFuture = Pin<Box<dyn std::future::Future<Output = Self::Output> + Send + 'a>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move {
            let mut contents = self.history;
            contents.push(GeminiContent::user_parts(self.user_parts));

            let response = self
                .client
                .call_gemini(
                    self.model,
                    contents,
                    self.system_prompt.map(GeminiContent::system),
                    None,
                    Vec::new(),
                )
                .await?;

            response.first_text()
        })
    }
}

impl<S> Client<S>
where
    S: HasProvider<Gemini> + Clone + Send + Sync + 'static,
{
    /// Call Gemini's generate content API
    ///
    /// # Example
    /// ```ignore
    /// let client = Client::new().with_gemini("your-api-key");
    /// let contents = vec![GeminiContent::user("Hello!")];
    /// let response = client.call_gemini(
    ///     "gemini-2.0-flash",
    ///     contents,
    ///     Some(GeminiContent::system("You are helpful.")),
    ///     None,
    ///     Vec::new(),
    /// ).await?;
    /// ```
    pub async fn call_gemini(
        &self,
        model: impl Into<String>,
        contents: Vec<GeminiContent>,
        system_instruction: Option<GeminiContent>,
        generation_config: Option<GeminiGenerationConfig>,
        tools: Vec<GeminiTool>,
    ) -> Result<GeminiResponse, LLMError> {
        let config = self.gemini_config.as_ref().ok_or_else(|| {
            LLMError::ProviderNotConfigured("Gemini not configured".to_string())
        })?;

        let model_name = model.into();
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            config.base_url, model_name, config.api_key
        );

        let request = GeminiRequest {
            contents,
            system_instruction,
            generation_config,
            tools,
        };
        debug!("calling {} with {} content(s)", model_name, request.contents.len());

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LLMError::GeminiError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let gemini_response: GeminiResponse = response.json().await?;
        Ok(gemini_response)
    }

    /// Convenience method for single-turn completions using a builder pattern
    ///
    /// # Example
    /// ```ignore
    /// let reply = client.gemini_complete("gemini-2.0-flash", "Hello!")
    ///     .system("You are a helpful assistant.")
    ///     .await?;
    /// ```
    pub fn gemini_complete(
        &self,
        model: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> GeminiCompletionBuilder<'_, S> {
        GeminiCompletionBuilder::new(self, model, user_prompt)
    }
}
