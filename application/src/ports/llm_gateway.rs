//! LLM Gateway port
//!
//! Defines the interface for talking to text- and image-generation models.

use async_trait::async_trait;
use storybook_domain::{Model, PageImage};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Timeout")]
    Timeout,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Request failed (HTTP {status}): {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Model returned no image: {0}")]
    NoImage(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl GatewayError {
    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            GatewayError::ConnectionError(_)
            | GatewayError::Timeout
            | GatewayError::RateLimited(_) => true,
            GatewayError::RequestFailed { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// A chat request for plain text
#[derive(Debug, Clone, Copy)]
pub struct TextRequest<'a> {
    pub model: &'a Model,
    pub system_prompt: &'a str,
    pub user_prompt: &'a str,
    pub temperature: f32,
}

/// A request for one illustration
///
/// `reference` is the style anchor. It is `None` only for the first page.
#[derive(Debug, Clone, Copy)]
pub struct ImageRequest<'a> {
    pub model: &'a Model,
    pub prompt: &'a str,
    pub reference: Option<&'a PageImage>,
}

/// Gateway for LLM communication
///
/// This port defines how the application layer reaches the model provider.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send a system + user prompt and return the reply text
    async fn complete_text(&self, request: TextRequest<'_>) -> Result<String, GatewayError>;

    /// Generate one image, optionally conditioned on a reference image
    async fn generate_image(&self, request: ImageRequest<'_>) -> Result<PageImage, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(GatewayError::Timeout.is_transient());
        assert!(GatewayError::RateLimited("slow down".into()).is_transient());
        assert!(
            GatewayError::RequestFailed {
                status: 503,
                message: "unavailable".into()
            }
            .is_transient()
        );
        assert!(
            !GatewayError::RequestFailed {
                status: 400,
                message: "bad".into()
            }
            .is_transient()
        );
        assert!(!GatewayError::Unauthorized("no key".into()).is_transient());
        assert!(!GatewayError::NoImage("text only".into()).is_transient());
    }
}
