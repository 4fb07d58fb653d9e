use std::sync::Arc;

use log::{error, info, warn};

use crate::core::decision::{Decision, DecisionMaker};
use crate::core::envelope::Envelope;
use crate::core::error::{CapabilityError, RouteError};
use crate::core::oracle::Oracle;
use crate::core::query::{DEFAULT_MEDIA_PROMPT, Query};
use crate::core::registry::CapabilityRegistry;
use crate::core::worker::Worker;

pub const HISTORY_CLEARED: &str = "Your conversation history has been cleared.";
pub const NOTHING_TO_CLEAR: &str = "No conversation history found to clear.";

/// Routes one request end to end and always answers with an [`Envelope`].
#[derive(Clone)]
pub struct Dispatcher {
    decisions: DecisionMaker,
    registry: Arc<CapabilityRegistry>,
}

impl Dispatcher {
    pub fn new(oracle: Arc<dyn Oracle>, registry: Arc<CapabilityRegistry>) -> Self {
        Self {
            decisions: DecisionMaker::new(oracle),
            registry,
        }
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    pub async fn route_query(&self, query: &Query) -> Envelope {
        self.route(&query.user_id, &query.text, &query.urls).await
    }

    /// Classifies `text`, runs the chosen handler and normalizes its outcome.
    ///
    /// Non-empty `external_urls` replace whatever URLs the oracle extracted.
    pub async fn route(&self, user_id: &str, text: &str, external_urls: &[String]) -> Envelope {
        match self.try_route(user_id, text, external_urls).await {
            Ok(envelope) => envelope,
            Err(err) => {
                match &err {
                    RouteError::HandlerFailure { worker, source } => {
                        error!("[{}] {} handler failed: {}", user_id, worker, source);
                    }
                    other => warn!("[{}] request rejected: {}", user_id, other),
                }
                err.into()
            }
        }
    }

    async fn try_route(
        &self,
        user_id: &str,
        text: &str,
        external_urls: &[String],
    ) -> Result<Envelope, RouteError> {
        let text = text.trim();
        if user_id.trim().is_empty() || (text.is_empty() && external_urls.is_empty()) {
            return Err(RouteError::InvalidRequest);
        }
        let text = if text.is_empty() {
            DEFAULT_MEDIA_PROMPT
        } else {
            text
        };

        let mut decision = self.decisions.decide(user_id, text).await;
        if !external_urls.is_empty() {
            decision.urls = external_urls.to_vec();
        }
        info!(
            "[{}] dispatching {} with {} url(s)",
            user_id,
            decision.worker,
            decision.urls.len()
        );

        self.invoke(user_id, decision).await
    }

    async fn invoke(&self, user_id: &str, decision: Decision) -> Result<Envelope, RouteError> {
        let Decision {
            worker,
            prompt,
            urls,
        } = decision;

        if worker.requires_media() && urls.is_empty() {
            return Err(RouteError::MediaRequired(worker));
        }
        let registry = &self.registry;

        // Only a thinkgen that was never configured reroutes. A configured one
        // that fails at call time reports its own failure.
        let worker = if worker == Worker::ThinkGen && registry.thinkgen.is_none() {
            info!("[{}] thinkgen not configured, falling back to textgen", user_id);
            Worker::TextGen
        } else {
            worker
        };

        let first_url = urls.first().map(String::as_str).unwrap_or_default();
        let unavailable = || RouteError::CapabilityUnavailable(worker);
        let failed = |source: CapabilityError| RouteError::HandlerFailure { worker, source };

        match worker {
            Worker::TextGen => {
                let textgen = registry.textgen.as_ref().ok_or_else(unavailable)?;
                let reply = textgen.respond(user_id, &prompt).await.map_err(failed)?;
                Ok(Envelope::text(reply))
            }
            Worker::ThinkGen => {
                let thinkgen = registry.thinkgen.as_ref().ok_or_else(unavailable)?;
                let reply = thinkgen.respond(user_id, &prompt).await.map_err(failed)?;
                Ok(Envelope::text(reply))
            }
            Worker::Code => {
                let code = registry.code.as_ref().ok_or_else(unavailable)?;
                let reply = code.respond(user_id, &prompt).await.map_err(failed)?;
                Ok(Envelope::code(reply))
            }
            Worker::AudioToText => {
                let audio = registry.audio.as_ref().ok_or_else(unavailable)?;
                let reply = audio
                    .describe(user_id, &prompt, first_url)
                    .await
                    .map_err(failed)?;
                Ok(Envelope::text(reply))
            }
            Worker::ImageToText => {
                let vision = registry.vision.as_ref().ok_or_else(unavailable)?;
                let reply = vision
                    .describe_all(user_id, &prompt, &urls)
                    .await
                    .map_err(failed)?;
                Ok(Envelope::text(reply))
            }
            Worker::VideoToText => {
                let video = registry.video.as_ref().ok_or_else(unavailable)?;
                let reply = video
                    .describe(user_id, &prompt, first_url)
                    .await
                    .map_err(failed)?;
                Ok(Envelope::text(reply))
            }
            Worker::YouTubeToText => {
                let youtube = registry.youtube.as_ref().ok_or_else(unavailable)?;
                let reply = youtube
                    .describe(user_id, &prompt, first_url)
                    .await
                    .map_err(failed)?;
                Ok(Envelope::text(reply))
            }
            Worker::GenerateImage => {
                let generator = registry.image_generation.as_ref().ok_or_else(unavailable)?;
                let image = generator.generate(user_id, &prompt).await.map_err(failed)?;
                Ok(Envelope::generated_image(image.model_response, image.image_url))
            }
            Worker::EditImage => {
                let editor = registry.image_editing.as_ref().ok_or_else(unavailable)?;
                let edited = editor
                    .edit(user_id, first_url, &prompt)
                    .await
                    .map_err(failed)?;
                Ok(Envelope::edited_image(
                    edited.model_response,
                    edited.original_url,
                    edited.edited_image_url,
                ))
            }
            Worker::Clear => {
                let store = registry.store.as_ref().ok_or_else(unavailable)?;
                let existed = store
                    .clear(user_id)
                    .await
                    .map_err(|e| failed(e.into()))?;
                Ok(Envelope::text(if existed {
                    HISTORY_CLEARED
                } else {
                    NOTHING_TO_CLEAR
                }))
            }
        }
    }
}
