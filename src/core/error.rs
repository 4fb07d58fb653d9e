use thiserror::Error;

use crate::core::worker::Worker;

/// Everything that can go wrong while routing one request.
///
/// `OracleUnavailable`, `DecisionUnparseable` and `UnknownWorker` are recovered
/// inside the decision maker and only ever logged. The rest end up as the
/// message of a failure [`Envelope`](crate::core::envelope::Envelope).
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("A prompt or at least one media URL is required")]
    InvalidRequest,

    #[error("Oracle unavailable: {0}")]
    OracleUnavailable(#[from] OracleError),

    #[error("Decision unparseable: {0}")]
    DecisionUnparseable(String),

    #[error("Unknown worker: {0}")]
    UnknownWorker(String),

    #[error("{}", media_required_message(.0))]
    MediaRequired(Worker),

    #[error("{}", unavailable_message(.0))]
    CapabilityUnavailable(Worker),

    #[error("{}", failure_message(.worker))]
    HandlerFailure {
        worker: Worker,
        #[source]
        source: CapabilityError,
    },
}

/// Failure of the classification call itself (network, auth, quota, empty answer).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct OracleError(pub String);

/// Failure raised by a capability handler. Never shown to the end user.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[cfg(feature = "gemini")]
    #[error(transparent)]
    Llm(#[from] crate::llm::LLMError),

    #[cfg(feature = "gemini")]
    #[error(transparent)]
    Media(#[from] crate::workers::media::MediaError),

    #[cfg(feature = "gemini")]
    #[error(transparent)]
    Upload(#[from] crate::workers::upload::UploadError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("No image was generated")]
    NoImage,

    #[error("{0}")]
    Other(String),
}

/// Conversation storage failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn media_required_message(worker: &Worker) -> &'static str {
    match worker {
        Worker::AudioToText => "Audio URL is required for audio processing",
        Worker::ImageToText => "Image URL is required for image analysis",
        Worker::EditImage => "Image URL is required for image editing",
        Worker::VideoToText => "Video URL is required for video analysis",
        Worker::YouTubeToText => "YouTube URL is required for YouTube video analysis",
        _ => "A media URL is required for this request",
    }
}

fn unavailable_message(worker: &Worker) -> &'static str {
    match worker {
        Worker::TextGen => "Text generation is not available",
        Worker::AudioToText => "Audio processing is not available",
        Worker::ImageToText => "Image analysis is not available",
        Worker::GenerateImage => "Image generation is not available",
        Worker::EditImage => "Image editing is not available",
        Worker::ThinkGen => "Deep thinking is not available",
        Worker::VideoToText => "Video analysis is not available",
        Worker::YouTubeToText => "YouTube video analysis is not available",
        Worker::Clear => "Conversation history is not available",
        Worker::Code => "Code generation is not available",
    }
}

fn failure_message(worker: &Worker) -> &'static str {
    match worker {
        Worker::TextGen => "Failed to generate text response",
        Worker::AudioToText => "Failed to process audio",
        Worker::ImageToText => "Failed to analyze image",
        Worker::GenerateImage => "Failed to generate image",
        Worker::EditImage => "Failed to edit image",
        Worker::ThinkGen => "Failed to generate deep thinking response",
        Worker::VideoToText => "Failed to analyze video",
        Worker::YouTubeToText => "Failed to analyze YouTube video",
        Worker::Clear => "Failed to clear conversation history",
        Worker::Code => "Failed to generate code",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_failure_hides_the_cause() {
        let err = RouteError::HandlerFailure {
            worker: Worker::AudioToText,
            source: CapabilityError::Other("quota exceeded for key abc".to_string()),
        };
        assert_eq!(err.to_string(), "Failed to process audio");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_media_required_messages() {
        assert_eq!(
            RouteError::MediaRequired(Worker::AudioToText).to_string(),
            "Audio URL is required for audio processing"
        );
        assert_eq!(
            RouteError::MediaRequired(Worker::YouTubeToText).to_string(),
            "YouTube URL is required for YouTube video analysis"
        );
    }
}
