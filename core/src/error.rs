//! Error types for the operadoras API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the operadora does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `Http` with the raw status
//! code and body. Transport failures (DNS, connect, timeout) keep the
//! underlying `reqwest::Error` untouched.

/// Client-wide result type.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by the request builders, parsers, and `ApiClient`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Invalid base URL or environment value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The request never produced a response: DNS, connect, or timeout.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server returned 404.
    #[error("resource not found: {body}")]
    NotFound { body: String },

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    /// Whether the request was abandoned because the client timeout elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Transport(e) if e.is_timeout())
    }

    /// HTTP status carried by the error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
