use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::warn;
use uuid::Uuid;

use crate::store::file::file_stem;

/// A file written under the temp directory, removed when dropped.
///
/// Removal is best effort: failures are logged and otherwise ignored.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
}

impl StagedFile {
    /// Writes `bytes` to `{dir}/{name}`, creating `dir` if needed.
    pub async fn write(dir: &Path, name: &str, bytes: &[u8]) -> std::io::Result<Self> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(name);
        // Guard first so a partial write is still cleaned up
        let staged = Self { path };
        tokio::fs::write(&staged.path, bytes).await?;
        Ok(staged)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            if err.kind() != ErrorKind::NotFound {
                warn!(
                    "Could not delete temporary file {}: {}",
                    self.path.display(),
                    err
                );
            }
        }
    }
}

/// `{prefix}{user}_{millis}_{id}.png`. The random id keeps concurrent requests
/// from the same user apart.
pub fn staged_name(prefix: &str, user_id: &str) -> String {
    format!(
        "{}{}_{}_{}.png",
        prefix,
        file_stem(user_id),
        chrono::Utc::now().timestamp_millis(),
        Uuid::new_v4().simple()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagedFile::write(&dir.path().join("temp"), "a.png", b"png")
            .await
            .unwrap();
        let path = staged.path().to_path_buf();
        assert_eq!(std::fs::read(&path).unwrap(), b"png");

        drop(staged);
        assert!(!path.exists());
    }

    #[test]
    fn test_staged_name() {
        let name = staged_name("edited_", "42");
        assert!(name.starts_with("edited_42_"));
        assert!(name.ends_with(".png"));
        assert!(staged_name("", "a/b").starts_with("a_2fb_"));
    }

    #[test]
    fn test_staged_names_are_unique_per_call() {
        let first = staged_name("", "42");
        let second = staged_name("", "42");
        assert_ne!(first, second);
    }
}
