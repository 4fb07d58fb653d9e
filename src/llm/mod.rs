//! Gemini REST client
//!
//! A thin wrapper around `reqwest::Client` that uses a typestate to track
//! whether the provider has been configured. Calls that need credentials only
//! exist on `Client<Enabled>`, so a half-built client cannot reach the API.

pub mod error;
pub mod gemini;
pub mod oracle;

use std::marker::PhantomData;

pub use error::LLMError;
pub use gemini::{
    Gemini, GeminiCompletionBuilder, GeminiConfig, GeminiContent, GeminiGenerationConfig,
    GeminiPart, GeminiResponse, GeminiTool, InlineData,
};
pub use oracle::GeminiOracle;

/// LLM client wrapper around reqwest::Client
#[derive(Clone)]
pub struct Client<S> {
    /// The underlying HTTP client
    pub(crate) client: reqwest::Client,
    pub(crate) state: PhantomData<S>,
    pub(crate) gemini_config: Option<GeminiConfig>,
}

// ============================================================================
// Type States
// ============================================================================

/// Marker indicating the provider is enabled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Enabled;

/// Marker indicating the provider is disabled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Disabled;

/// Trait to check if a provider is available on this client
pub trait HasProvider<Provider> {}

impl HasProvider<Gemini> for Enabled {}

/// A client ready to call Gemini.
pub type GeminiClient = Client<Enabled>;

// ============================================================================
// Client constructors and builders
// ============================================================================

impl Client<Disabled> {
    /// Create a new client with no provider configured
    pub fn new() -> Self {
        Self::with_http(reqwest::Client::new())
    }

    /// Reuse an existing HTTP client (connection pool, proxies, timeouts).
    pub fn with_http(client: reqwest::Client) -> Self {
        Client {
            client,
            state: PhantomData,
            gemini_config: None,
        }
    }

    /// Enable Gemini with API key and default base URL
    pub fn with_gemini(self, api_key: impl Into<String>) -> Client<Enabled> {
        self.with_gemini_at(api_key, gemini::DEFAULT_BASE_URL)
    }

    /// Enable Gemini with API key and custom base URL
    pub fn with_gemini_at(
        self,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Client<Enabled> {
        Client {
            client: self.client,
            state: PhantomData,
            gemini_config: Some(GeminiConfig {
                api_key: api_key.into(),
                base_url: base_url.into(),
            }),
        }
    }
}

impl Default for Client<Disabled> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Deref to reqwest::Client for direct HTTP usage (media downloads, uploads)
// ============================================================================

impl<S> std::ops::Deref for Client<S> {
    type Target = reqwest::Client;
    fn deref(&self) -> &Self::Target {
        &self.client
    }
}
