use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of capabilities a request can be routed to.
///
/// The wire names (`textgen`, `audio2txt`, ...) are what the oracle emits and what
/// appears in logs; they never change.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Worker {
    /// General conversation
    #[default]
    #[serde(rename = "textgen")]
    TextGen,
    /// Audio transcription or questions about a clip
    #[serde(rename = "audio2txt")]
    AudioToText,
    /// Image description
    #[serde(rename = "img2txt")]
    ImageToText,
    /// Image generation from a description
    #[serde(rename = "genimg")]
    GenerateImage,
    /// Image editing
    #[serde(rename = "genai")]
    EditImage,
    /// Deep reasoning
    #[serde(rename = "thinkgen")]
    ThinkGen,
    /// Regular (non-YouTube) video description
    #[serde(rename = "vid2txt")]
    VideoToText,
    /// YouTube video description
    #[serde(rename = "ytb2txt")]
    YouTubeToText,
    /// Conversation reset
    #[serde(rename = "clear")]
    Clear,
    /// Code assistance
    #[serde(rename = "code")]
    Code,
}

impl Worker {
    /// Every worker, in the order the routing instruction lists them.
    pub const ALL: [Worker; 10] = [
        Worker::TextGen,
        Worker::AudioToText,
        Worker::ImageToText,
        Worker::GenerateImage,
        Worker::EditImage,
        Worker::ThinkGen,
        Worker::VideoToText,
        Worker::YouTubeToText,
        Worker::Clear,
        Worker::Code,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Worker::TextGen => "textgen",
            Worker::AudioToText => "audio2txt",
            Worker::ImageToText => "img2txt",
            Worker::GenerateImage => "genimg",
            Worker::EditImage => "genai",
            Worker::ThinkGen => "thinkgen",
            Worker::VideoToText => "vid2txt",
            Worker::YouTubeToText => "ytb2txt",
            Worker::Clear => "clear",
            Worker::Code => "code",
        }
    }

    /// Whether the worker cannot run without at least one media URL.
    pub fn requires_media(&self) -> bool {
        matches!(
            self,
            Worker::AudioToText
                | Worker::ImageToText
                | Worker::EditImage
                | Worker::VideoToText
                | Worker::YouTubeToText
        )
    }

    /// One-line description used when enumerating workers for the oracle.
    pub fn description(&self) -> &'static str {
        match self {
            Worker::TextGen => "Handles general conversation, questions, and text-based responses",
            Worker::AudioToText => {
                "Processes audio files or voice messages and transcribes them or answers queries about the audio, song, or voice clips"
            }
            Worker::ImageToText => {
                "Analyzes images and generates detailed descriptions or answers queries about the image"
            }
            Worker::GenerateImage => "Creates images from text descriptions",
            Worker::EditImage => "Edits images based on user instructions",
            Worker::ThinkGen => "Performs deep reasoning and generates complex text responses",
            Worker::VideoToText => {
                "Analyzes regular video files (not YouTube URLs) and describes content or answers queries about the video"
            }
            Worker::YouTubeToText => {
                "Processes YouTube video URLs (e.g., youtube.com/watch?v=) exclusively and answers queries about the video"
            }
            Worker::Clear => "Resets or clears conversation history",
            Worker::Code => "Assists with coding tasks, including writing, debugging, or running code",
        }
    }
}

impl fmt::Display for Worker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a name is outside the closed worker set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownWorker(pub String);

impl fmt::Display for UnknownWorker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown worker: {}", self.0)
    }
}

impl std::error::Error for UnknownWorker {}

impl FromStr for Worker {
    type Err = UnknownWorker;

    /// Exact, case-sensitive match on the wire name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Worker::ALL
            .iter()
            .copied()
            .find(|w| w.as_str() == s)
            .ok_or_else(|| UnknownWorker(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_round_trip_through_from_str() {
        for worker in Worker::ALL {
            assert_eq!(worker.as_str().parse::<Worker>(), Ok(worker));
        }
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        assert_eq!(
            "translate".parse::<Worker>(),
            Err(UnknownWorker("translate".to_string()))
        );
        // Names are case-sensitive on the wire
        assert!("TextGen".parse::<Worker>().is_err());
    }

    #[test]
    fn test_media_requirements() {
        let needs_media: Vec<&str> = Worker::ALL
            .iter()
            .filter(|w| w.requires_media())
            .map(|w| w.as_str())
            .collect();
        assert_eq!(needs_media, vec!["audio2txt", "img2txt", "genai", "vid2txt", "ytb2txt"]);
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&Worker::YouTubeToText).unwrap();
        assert_eq!(json, "\"ytb2txt\"");
        let parsed: Worker = serde_json::from_str("\"genai\"").unwrap();
        assert_eq!(parsed, Worker::EditImage);
    }
}
