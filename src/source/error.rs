use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("upstream unavailable: {0}")]
    Unavailable(String),
    #[error("malformed upstream response: {0}")]
    Malformed(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

impl SourceError {
    /// A malformed payload will not get better by asking again.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, SourceError::Malformed(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SourceError::Unavailable(_) => "upstream_unavailable",
            SourceError::Malformed(_) => "upstream_malformed",
            SourceError::Timeout(_) => "request_timeout",
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Unavailable(err.to_string())
    }
}
