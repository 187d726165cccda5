use thiserror::Error;

#[derive(Debug, Error)]
pub enum BadgeError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Decode error: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("Encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("Serde JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot error: {0}")]
    SnapshotError(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid badge request: {0}")]
    Validation(String),

    #[error("Identity not found upstream: {0}")]
    NotFound(String),

    #[error("rate-limited")]
    RateLimited,

    #[error("upstream request timed out")]
    Timeout,

    #[error("upstream responded with status {0}")]
    UpstreamStatus(u16),

    #[error("upstream error: {0}")]
    Upstream(String),
}

impl From<std::io::Error> for BadgeError {
    fn from(e: std::io::Error) -> Self {
        BadgeError::Io(e.to_string())
    }
}

impl From<reqwest::Error> for BadgeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            BadgeError::Timeout
        } else {
            BadgeError::Upstream(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, BadgeError>;
