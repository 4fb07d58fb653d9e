use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use log::debug;

use crate::core::capability::{ConversationStore, ConversationTurn};
use crate::core::error::StoreError;

/// Keeps each user's history as a pretty-printed JSON array in `{dir}/{uid}.json`.
///
/// Appends are a whole-file read-modify-write, so two concurrent writers for the
/// same user can lose a turn.
#[derive(Debug, Clone)]
pub struct FileConversationStore {
    dir: PathBuf,
}

impl FileConversationStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the record for `user_id`, always directly inside the data directory.
    pub fn path_for(&self, user_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(user_id)))
    }
}

/// Encodes a user id as a file stem. Lowercase ASCII letters, digits and `-`
/// are kept; every other byte becomes `_xx` (lowercase hex). The mapping is
/// injective, also on case-insensitive filesystems.
pub fn file_stem(user_id: &str) -> String {
    let mut stem = String::with_capacity(user_id.len());
    for byte in user_id.bytes() {
        match byte {
            b'a'..=b'z' | b'0'..=b'9' | b'-' => stem.push(char::from(byte)),
            _ => stem.push_str(&format!("_{byte:02x}")),
        }
    }
    stem
}

#[async_trait]
impl ConversationStore for FileConversationStore {
    async fn append(&self, user_id: &str, user: &str, model: &str) -> Result<(), StoreError> {
        let mut history = self.read(user_id).await?;
        history.push(ConversationTurn::user(user));
        history.push(ConversationTurn::model(model));

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(user_id);
        tokio::fs::write(&path, serde_json::to_vec_pretty(&history)?).await?;
        debug!("stored {} turns in {}", history.len(), path.display());
        Ok(())
    }

    async fn read(&self, user_id: &str) -> Result<Vec<ConversationTurn>, StoreError> {
        match tokio::fs::read(self.path_for(user_id)).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn clear(&self, user_id: &str) -> Result<bool, StoreError> {
        match tokio::fs::remove_file(self.path_for(user_id)).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}
