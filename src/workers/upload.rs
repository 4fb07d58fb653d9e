//! Anonymous file hosting for generated images.

use std::path::Path;

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::core::capability::Uploader;
use crate::core::error::CapabilityError;
use crate::workers::media::BROWSER_USER_AGENT;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Upload request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upload rejected: HTTP {0}")]
    Status(u16),

    #[error("Upload response did not contain a file URL")]
    MissingUrl,
}

#[derive(Debug, Deserialize)]
struct UguuResponse {
    #[serde(default)]
    files: Vec<UguuFile>,
}

#[derive(Debug, Deserialize)]
struct UguuFile {
    url: String,
}

/// Posts files to an uguu-compatible endpoint as multipart field `files[]`.
#[derive(Debug, Clone)]
pub struct UguuUploader {
    http: reqwest::Client,
    endpoint: String,
}

impl UguuUploader {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub async fn upload_file(&self, path: &Path) -> Result<String, UploadError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| UploadError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.png".to_string());

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("image/png")?;
        let form = reqwest::multipart::Form::new().part("files[]", part);

        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(UploadError::Status(response.status().as_u16()));
        }

        let body: UguuResponse = response.json().await?;
        let url = first_file_url(body)?;
        debug!("uploaded {} to {}", path.display(), url);
        Ok(url)
    }
}

fn first_file_url(body: UguuResponse) -> Result<String, UploadError> {
    body.files
        .into_iter()
        .next()
        .map(|file| file.url)
        .ok_or(UploadError::MissingUrl)
}

#[async_trait]
impl Uploader for UguuUploader {
    async fn upload(&self, path: &Path) -> Result<String, CapabilityError> {
        Ok(self.upload_file(path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_file_url() {
        let body: UguuResponse = serde_json::from_str(
            r#"{"success":true,"files":[{"hash":"h","filename":"a.png","url":"https://u.uguu.se/a.png","size":3}]}"#,
        )
        .unwrap();
        assert_eq!(first_file_url(body).unwrap(), "https://u.uguu.se/a.png");

        let empty: UguuResponse = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert!(matches!(first_file_url(empty), Err(UploadError::MissingUrl)));
    }

    #[tokio::test]
    async fn test_missing_file_is_a_read_error() {
        let uploader = UguuUploader::new(reqwest::Client::new(), "http://127.0.0.1:9/upload.php");
        let err = uploader
            .upload_file(Path::new("/definitely/not/here.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Read { .. }));
    }
}
