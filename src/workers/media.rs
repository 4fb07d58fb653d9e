//! Media download and MIME type resolution.

use log::debug;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

use crate::llm::InlineData;

/// Sent on every media download; some hosts refuse clients without one.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to fetch {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Image,
    Video,
}

impl MediaKind {
    pub fn default_mime(&self) -> &'static str {
        match self {
            MediaKind::Audio => "audio/mp3",
            MediaKind::Image => "image/jpeg",
            MediaKind::Video => "video/mp4",
        }
    }

    /// Whether a server-declared content type is trusted for this kind.
    fn accepts_content_type(&self, content_type: &str) -> bool {
        match self {
            MediaKind::Audio => content_type != "application/octet-stream",
            MediaKind::Image => content_type.starts_with("image/"),
            MediaKind::Video => content_type.starts_with("video/"),
        }
    }

    fn mime_for_extension(&self, ext: &str) -> Option<&'static str> {
        let mime = match (self, ext) {
            (MediaKind::Audio, "mp3") => "audio/mp3",
            (MediaKind::Audio, "wav") => "audio/wav",
            (MediaKind::Audio, "ogg") => "audio/ogg",
            (MediaKind::Audio, "flac") => "audio/flac",
            (MediaKind::Audio, "aac") => "audio/aac",
            (MediaKind::Audio, "m4a") => "audio/mp4",
            (MediaKind::Audio, "wma") => "audio/x-ms-wma",
            (MediaKind::Image, "jpg" | "jpeg") => "image/jpeg",
            (MediaKind::Image, "png") => "image/png",
            (MediaKind::Image, "gif") => "image/gif",
            (MediaKind::Image, "webp") => "image/webp",
            (MediaKind::Image, "bmp") => "image/bmp",
            (MediaKind::Image, "tiff") => "image/tiff",
            (MediaKind::Image, "svg") => "image/svg+xml",
            (MediaKind::Video, "mp4") => "video/mp4",
            (MediaKind::Video, "mpeg") => "video/mpeg",
            (MediaKind::Video, "mov") => "video/mov",
            (MediaKind::Video, "avi") => "video/avi",
            (MediaKind::Video, "flv") => "video/x-flv",
            (MediaKind::Video, "mpg") => "video/mpg",
            (MediaKind::Video, "webm") => "video/webm",
            (MediaKind::Video, "wmv") => "video/wmv",
            (MediaKind::Video, "3gp") => "video/3gpp",
            _ => return None,
        };
        Some(mime)
    }
}

/// Lowercased extension of the URL's last path segment, ignoring query and fragment.
pub fn url_extension(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let path = path.split_once("://").map_or(path, |(_, rest)| rest);
    let segment = path.rsplit('/').next()?;
    let (stem, ext) = segment.rsplit_once('.')?;
    (!stem.is_empty() && !ext.is_empty()).then(|| ext.to_ascii_lowercase())
}

/// Picks the MIME type: trusted content type, then extension, then the kind's default.
pub fn resolve_mime(kind: MediaKind, content_type: Option<&str>, url: &str) -> String {
    if let Some(content_type) = content_type.map(str::trim).filter(|c| !c.is_empty()) {
        if kind.accepts_content_type(content_type) {
            return content_type.to_string();
        }
    }
    url_extension(url)
        .and_then(|ext| kind.mime_for_extension(&ext))
        .unwrap_or(kind.default_mime())
        .to_string()
}

/// A downloaded media file.
#[derive(Debug, Clone)]
pub struct FetchedMedia {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl FetchedMedia {
    pub fn to_inline(&self) -> InlineData {
        InlineData::from_bytes(self.mime_type.clone(), &self.bytes)
    }
}

/// Downloads `url` with a browser User-Agent.
pub async fn fetch(
    http: &reqwest::Client,
    kind: MediaKind,
    url: &str,
) -> Result<FetchedMedia, MediaError> {
    let fetch_err = |source: reqwest::Error| MediaError::Fetch {
        url: url.to_string(),
        source,
    };
    let response = http
        .get(url)
        .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
        .send()
        .await
        .map_err(fetch_err)?;

    if !response.status().is_success() {
        return Err(MediaError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let bytes = response.bytes().await.map_err(fetch_err)?.to_vec();
    let mime_type = resolve_mime(kind, content_type.as_deref(), url);
    debug!("fetched {} bytes of {} from {}", bytes.len(), mime_type, url);

    Ok(FetchedMedia { bytes, mime_type })
}

/// Re-encodes any decodable image as PNG.
pub fn to_png(bytes: &[u8]) -> Result<Vec<u8>, MediaError> {
    let decoded = image::load_from_memory(bytes)?;
    let mut png = std::io::Cursor::new(Vec::new());
    decoded.write_to(&mut png, image::ImageFormat::Png)?;
    Ok(png.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_extension() {
        assert_eq!(url_extension("https://x.io/a/b/Song.MP3?sig=1#t=3").as_deref(), Some("mp3"));
        assert_eq!(url_extension("https://x.io/clip.v2.webm").as_deref(), Some("webm"));
        assert_eq!(url_extension("https://x.io/download"), None);
        assert_eq!(url_extension("https://x.io/"), None);
        assert_eq!(url_extension("https://x.io/.hidden"), None);
    }

    #[test]
    fn test_audio_mime_resolution() {
        assert_eq!(resolve_mime(MediaKind::Audio, Some("audio/ogg"), "https://x/a.mp3"), "audio/ogg");
        assert_eq!(
            resolve_mime(MediaKind::Audio, Some("application/octet-stream"), "https://x/a.m4a"),
            "audio/mp4"
        );
        assert_eq!(resolve_mime(MediaKind::Audio, None, "https://x/a.xyz"), "audio/mp3");
    }

    #[test]
    fn test_image_and_video_mime_resolution() {
        assert_eq!(resolve_mime(MediaKind::Image, Some("text/html"), "https://x/p.PNG"), "image/png");
        assert_eq!(resolve_mime(MediaKind::Image, Some("image/webp"), "https://x/p.png"), "image/webp");
        assert_eq!(resolve_mime(MediaKind::Image, None, "https://x/p"), "image/jpeg");
        assert_eq!(resolve_mime(MediaKind::Video, None, "https://x/v.3gp"), "video/3gpp");
        assert_eq!(resolve_mime(MediaKind::Video, None, "https://x/v.mkv"), "video/mp4");
    }

    #[test]
    fn test_png_conversion() {
        let mut source = std::io::Cursor::new(Vec::new());
        image::RgbImage::new(2, 2)
            .write_to(&mut source, image::ImageFormat::Bmp)
            .unwrap();
        let png = to_png(source.get_ref()).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        assert!(to_png(b"not an image").is_err());
    }
}
