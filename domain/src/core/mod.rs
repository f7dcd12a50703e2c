//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: model identifiers for text and image generation
//! - [`prompt::StoryPrompt`]: a validated, user-supplied story idea
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
pub mod prompt;
pub mod string;
