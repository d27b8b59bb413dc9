use thiserror::Error;

/// Backing store failures. Never leaves the cache layer.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache store unreachable: {0}")]
    Unavailable(String),
    #[error("cache store rejected command: {0}")]
    Command(String),
    #[error("cached value could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for CacheError {
    fn from(err: reqwest::Error) -> Self {
        CacheError::Unavailable(err.to_string())
    }
}
