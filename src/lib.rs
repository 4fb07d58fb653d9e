//! # Switchboard
//!
//! Routes free-form chat requests (text plus optional media links) to exactly
//! one generative capability, then normalizes whatever that capability returns
//! into a single [`Envelope`].
//!
//! ## Features
//!
//! - **Oracle-driven routing**: a language model classifies each request into a
//!   closed set of [`Worker`]s; malformed or hostile output degrades to `textgen`
//! - **One result shape**: every handler outcome, success or failure, becomes an [`Envelope`]
//! - **Swappable boundaries**: the oracle, every capability and the conversation
//!   store are traits, so the engine runs without network access in tests
//! - **Gemini handlers** (feature `gemini`, on by default): chat, code execution,
//!   audio/image/video/YouTube understanding, image generation and editing
//! - **HTTP front door** (feature `server`): `GET`/`POST /api/gemini` on axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use switchboard::prelude::*;
//!
//! struct Fixed;
//!
//! #[async_trait::async_trait]
//! impl Oracle for Fixed {
//!     async fn complete(&self, _system: &str, _query: &str) -> Result<String, OracleError> {
//!         Ok(r#"{"worker":"clear","prompt":"reset","urls":[]}"#.to_string())
//!     }
//! }
//!
//! # async fn run() {
//! let registry = CapabilityRegistry::new().with_store(Arc::new(MemoryConversationStore::new()));
//! let dispatcher = Dispatcher::new(Arc::new(Fixed), Arc::new(registry));
//! let envelope = dispatcher.route("user-1", "forget everything", &[]).await;
//! assert_eq!(envelope.message, "No conversation history found to clear.");
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`core`]: routing engine (decision parsing, dispatch, envelope, errors)
//! - [`store`]: conversation history stores
//! - [`config`]: settings from the environment
//! - `llm`: Gemini REST client (feature `gemini`)
//! - `workers`: Gemini-backed handlers (feature `gemini`)
//! - `http`: axum front door (feature `server`)

// ============================================================================
// Core Modules
// ============================================================================

pub mod config;
pub mod core;
pub mod store;

// ============================================================================
// Public Re-exports - Granular Imports
// ============================================================================

pub use config::{ConfigError, Settings};
pub use crate::core::capability::{
    ConversationStore, ConversationTurn, EditedImage, GalleryCapability, GeneratedImage,
    ImageEditing, ImageGeneration, MediaCapability, Role, TextCapability, TurnPart, Uploader,
};
pub use crate::core::decision::{Decision, DecisionMaker};
pub use crate::core::dispatch::Dispatcher;
pub use crate::core::envelope::{Envelope, EnvelopeType};
pub use crate::core::error::{CapabilityError, OracleError, RouteError, StoreError};
pub use crate::core::oracle::Oracle;
pub use crate::core::query::{ChatKind, InboundMessage, Query};
pub use crate::core::registry::CapabilityRegistry;
pub use crate::core::worker::Worker;
pub use store::{FileConversationStore, MemoryConversationStore};

// ============================================================================
// Prelude Module - Convenient Bulk Imports
// ============================================================================

/// Everything needed to build a registry, route requests and implement the
/// core traits.
///
/// # Example
/// ```rust
/// use switchboard::prelude::*;
/// ```
pub mod prelude {
    pub use super::{
        CapabilityError, CapabilityRegistry, ConversationStore, ConversationTurn, Decision,
        DecisionMaker, Dispatcher, EditedImage, Envelope, EnvelopeType, GalleryCapability,
        GeneratedImage, ImageEditing, ImageGeneration, InboundMessage, MediaCapability,
        MemoryConversationStore, Oracle, OracleError, Query, RouteError, StoreError,
        TextCapability, Worker,
    };
}

// ============================================================================
// Gemini Feature
// ============================================================================

#[cfg(feature = "gemini")]
pub mod llm;

#[cfg(feature = "gemini")]
pub mod workers;

#[cfg(feature = "gemini")]
pub use llm::{Client, GeminiOracle, LLMError};

// ============================================================================
// Server Feature
// ============================================================================

#[cfg(feature = "server")]
pub mod http;

// ============================================================================
// Library Metadata
// ============================================================================

/// The version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of this crate.
pub const NAME: &str = env!("CARGO_PKG_NAME");
