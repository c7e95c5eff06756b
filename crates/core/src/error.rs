use thiserror::Error;

#[derive(Error, Debug)]
pub enum VidsumError {
    #[error("Invalid video reference {url}: expected a `v=<id>` or `youtu.be/<id>` link")]
    InvalidReference { url: String },

    #[error("Transcript unavailable for {video_id} ({language}): {reason}")]
    TranscriptUnavailable {
        video_id: String,
        language: String,
        reason: String,
    },

    #[error("Summary generation failed: {reason}")]
    GenerationFailed { reason: String },

    #[error("Translation failed: {reason}")]
    TranslationFailed { reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("No chat-completion provider configured: set one of {tried}")]
    MissingProvider { tried: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("API request failed: {0}")]
    ApiError(reqwest::Error),
}

/// Request URLs may carry credentials in their query, so they are dropped
/// before the error is stored.
impl From<reqwest::Error> for VidsumError {
    fn from(e: reqwest::Error) -> Self {
        VidsumError::ApiError(e.without_url())
    }
}

pub type Result<T> = std::result::Result<T, VidsumError>;
