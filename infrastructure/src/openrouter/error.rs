//! Error types for the OpenRouter adapter

use storybook_application::GatewayError;
use thiserror::Error;

/// Result type alias for OpenRouter operations
pub type Result<T> = std::result::Result<T, OpenRouterError>;

/// Errors that can occur when communicating with OpenRouter
#[derive(Error, Debug)]
pub enum OpenRouterError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (HTTP {status}): {message}")]
    Status { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed data URL: {0}")]
    DataUrl(String),

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Response contained no choices")]
    EmptyChoices,

    #[error("Response contained no image (text was: {0})")]
    NoImage(String),

    #[error("Unsupported image payload: {0}")]
    UnsupportedImage(String),
}

impl OpenRouterError {
    /// Whether the request is worth sending again
    pub fn is_transient(&self) -> bool {
        match self {
            OpenRouterError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            OpenRouterError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<OpenRouterError> for GatewayError {
    fn from(err: OpenRouterError) -> Self {
        match err {
            OpenRouterError::Http(e) if e.is_timeout() => GatewayError::Timeout,
            OpenRouterError::Http(e) if e.is_connect() || e.is_request() => {
                GatewayError::ConnectionError(e.to_string())
            }
            OpenRouterError::Http(e) => GatewayError::Other(e.to_string()),
            OpenRouterError::Status { status, message } => match status {
                401 | 403 => GatewayError::Unauthorized(message),
                429 => GatewayError::RateLimited(message),
                _ => GatewayError::RequestFailed { status, message },
            },
            OpenRouterError::NoImage(text) => GatewayError::NoImage(text),
            e @ (OpenRouterError::Json(_)
            | OpenRouterError::DataUrl(_)
            | OpenRouterError::Base64(_)
            | OpenRouterError::EmptyChoices
            | OpenRouterError::UnsupportedImage(_)) => GatewayError::InvalidResponse(e.to_string()),
        }
    }
}
