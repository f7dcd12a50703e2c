//! OpenRouter adapter
//!
//! Implements LlmGateway over OpenRouter's OpenAI-compatible chat
//! completions API.

pub mod data_url;
pub mod error;
pub mod gateway;
pub mod protocol;
