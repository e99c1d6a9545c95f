//! Error types for the Concerto tour services.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, hydrating or serving tours.
#[derive(Error, Debug)]
pub enum Error {
    /// Outbound HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status from a remote resource
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Local file error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// AWS SDK error
    #[error("AWS error: {0}")]
    Aws(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Upstream events API returned something unusable
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::Validation("missing".into()).status_code(), 400);
        assert_eq!(Error::Config("no key".into()).status_code(), 500);
        assert_eq!(
            Error::Status {
                status: 404,
                url: "x".into()
            }
            .status_code(),
            500
        );
    }
}
