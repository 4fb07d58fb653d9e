use std::sync::Arc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::core::error::RouteError;
use crate::core::oracle::Oracle;
use crate::core::parser::{RawDecision, extract_decision_object};
use crate::core::worker::Worker;

/// A validated routing decision. `worker` is always inside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub worker: Worker,
    pub prompt: String,
    pub urls: Vec<String>,
}

impl Decision {
    /// The safe default: plain conversation with the untouched query.
    pub fn fallback(query: &str) -> Self {
        Self {
            worker: Worker::TextGen,
            prompt: query.to_string(),
            urls: Vec::new(),
        }
    }
}

/// Builds the system instruction that asks the oracle for a routing decision.
pub fn routing_instruction() -> String {
    let mut instruction = String::from(
        "You are an advanced AI assistant designed to precisely determine user intent and route requests \
to the most suitable worker based on a detailed analysis of the user's message. Your primary task is to \
examine the input for specific content types, including strictly identifying YouTube video URLs \
(e.g., youtube.com or youtu.be) for the YouTube video worker and regular video URLs for the video worker, \
regardless of file extension. Additionally, accurately detect and classify other media types by their URL \
extensions, such as images, audio, or videos, and assign the appropriate worker. Handle any file extension \
gracefully, using the provided examples as a guide but not as a strict limit.\n\nAvailable workers:\n",
    );

    for worker in Worker::ALL {
        instruction.push_str(&format!("- {}: {}\n", worker.as_str(), worker.description()));
    }

    instruction.push_str(
        "\nSupported file extension examples (not exhaustive):\n\
- Images: .jpg, .png, .gif, .webp\n\
- Audio: .mp3, .aac, .flac, .m4a, .m4p, .wav, .wma\n\
- Video: .mp4, .mov\n\
\n\
Output must strictly follow this JSON format:\n\
{\"worker\":\"workername\",\"prompt\":\"main text/instruction\",\"urls\":[\"url1\",\"url2\"]}\n\
\n\
Rules:\n\
- Return only the raw JSON object, no additional text, explanations, or code fences.\n\
- Include any URLs found in the user's query in the \"urls\" array.\n\
- If the query implies a media attachment (e.g., \"this image\" or \"this video\") but no URL is present in the text, \
assume the URL will be provided separately and include an empty \"urls\" array.\n\
- For non-YouTube video URLs, route to vid2txt regardless of extension; for images and audio, match by intent or \
extension examples, defaulting to textgen if unclear.\n\
- Prioritize the most specific worker for the task based on content type and intent.",
    );
    instruction
}

/// Turns a free-form query into a [`Decision`] using an [`Oracle`] as classifier.
///
/// `decide` never fails. Every problem with the oracle or its output collapses
/// into [`Decision::fallback`] or a `textgen` decision, and is logged.
#[derive(Clone)]
pub struct DecisionMaker {
    oracle: Arc<dyn Oracle>,
    instruction: String,
}

impl DecisionMaker {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self {
            oracle,
            instruction: routing_instruction(),
        }
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub async fn decide(&self, user_id: &str, query: &str) -> Decision {
        let raw = match self.oracle.complete(&self.instruction, query).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!("[{}] {}; using default decision", user_id, RouteError::from(err));
                return Decision::fallback(query);
            }
        };
        debug!("[{}] raw oracle response: {}", user_id, raw);

        let Some(object) = extract_decision_object(&raw) else {
            warn!(
                "[{}] {}; using default decision",
                user_id,
                RouteError::DecisionUnparseable(raw.chars().take(200).collect())
            );
            return Decision::fallback(query);
        };

        let coerced = RawDecision::from_object(&object);
        let worker = coerced.worker().unwrap_or_else(|name| {
            warn!(
                "[{}] {}; falling back to textgen",
                user_id,
                RouteError::UnknownWorker(name)
            );
            Worker::TextGen
        });

        let decision = Decision {
            worker,
            prompt: coerced.prompt.unwrap_or_else(|| query.to_string()),
            urls: coerced.urls,
        };
        info!(
            "[{}] routed to {} (urls: {:?})",
            user_id, decision.worker, decision.urls
        );
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::OracleError;
    use async_trait::async_trait;

    struct Scripted(Result<&'static str, &'static str>);

    #[async_trait]
    impl Oracle for Scripted {
        async fn complete(&self, _system: &str, _query: &str) -> Result<String, OracleError> {
            self.0
                .map(str::to_string)
                .map_err(|e| OracleError(e.to_string()))
        }
    }

    fn maker(response: Result<&'static str, &'static str>) -> DecisionMaker {
        DecisionMaker::new(Arc::new(Scripted(response)))
    }

    #[test]
    fn test_instruction_lists_every_worker() {
        let maker = maker(Ok("{}"));
        let instruction = maker.instruction();
        for worker in Worker::ALL {
            assert!(instruction.contains(&format!("- {}: ", worker.as_str())));
        }
        assert!(instruction.contains("Return only the raw JSON object"));
    }

    #[tokio::test]
    async fn test_oracle_failure_uses_fallback() {
        let decision = maker(Err("quota")).decide("u1", "hello").await;
        assert_eq!(decision, Decision::fallback("hello"));
    }

    #[tokio::test]
    async fn test_unparseable_uses_fallback() {
        let decision = maker(Ok("I cannot help with that")).decide("u1", "hi").await;
        assert_eq!(decision.worker, Worker::TextGen);
        assert_eq!(decision.prompt, "hi");
        assert!(decision.urls.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_worker_keeps_prompt_and_urls() {
        let decision = maker(Ok(r#"{"worker":"translate","prompt":"p","urls":["u"]}"#))
            .decide("u1", "q")
            .await;
        assert_eq!(
            decision,
            Decision {
                worker: Worker::TextGen,
                prompt: "p".to_string(),
                urls: vec!["u".to_string()],
            }
        );
    }

    #[tokio::test]
    async fn test_missing_prompt_uses_query() {
        let decision = maker(Ok("```json\n{\"worker\":\"genimg\",\"urls\":null}\n```"))
            .decide("u1", "draw a fox")
            .await;
        assert_eq!(decision.worker, Worker::GenerateImage);
        assert_eq!(decision.prompt, "draw a fox");
        assert!(decision.urls.is_empty());
    }
}
