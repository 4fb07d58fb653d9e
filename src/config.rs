//! Runtime settings read from the environment (and an optional `.env` file).

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_ROUTER_MODEL: &str = "gemini-2.0-flash-lite";
pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.0-flash-exp-image-generation";
pub const DEFAULT_UPLOAD_URL: &str = "https://uguu.se/upload.php";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set in environment variables")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    /// Model used by the oracle to classify requests
    pub router_model: String,
    pub chat_model: String,
    /// When unset, thinkgen requests are served by the chat model
    pub thinking_model: Option<String>,
    pub image_model: String,
    pub data_dir: PathBuf,
    pub temp_dir: PathBuf,
    pub upload_url: String,
    pub port: u16,
    pub request_timeout: Option<Duration>,
}

impl Settings {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            log::debug!(".env not loaded: {} (using process environment)", e);
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or_default = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let api_key = get("GEMINI_API_KEY").ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let request_timeout = match get("REQUEST_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "REQUEST_TIMEOUT_SECS",
                        value: raw,
                    });
                }
            },
            None => None,
        };

        Ok(Self {
            api_key,
            base_url: or_default("GEMINI_BASE_URL", DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            router_model: or_default("ROUTER_MODEL", DEFAULT_ROUTER_MODEL),
            chat_model: or_default("CHAT_MODEL", DEFAULT_CHAT_MODEL),
            thinking_model: get("THINKING_MODEL"),
            image_model: or_default("IMAGE_MODEL", DEFAULT_IMAGE_MODEL),
            data_dir: PathBuf::from(or_default("DATA_DIR", "data")),
            temp_dir: PathBuf::from(or_default("TEMP_DIR", "temp")),
            upload_url: or_default("UPLOAD_URL", DEFAULT_UPLOAD_URL),
            port,
            request_timeout,
        })
    }
}
