//! Error type shared by every source gateway.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("upstream returned status {code}")]
    Status { code: u16 },

    #[error("upstream request timed out")]
    Timeout,

    #[error("failed to parse upstream payload: {0}")]
    Parse(String),

    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, SourceError>;

impl SourceError {
    /// Collapse reqwest's own timeout signal into [`SourceError::Timeout`].
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout
        } else {
            SourceError::Http(err)
        }
    }
}
