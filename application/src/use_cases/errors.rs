//! Errors shared by the generation use cases

use crate::ports::book_repository::PersistenceError;
use crate::ports::llm_gateway::GatewayError;
use storybook_domain::{DomainError, ScriptParseError};
use thiserror::Error;

/// Failure to produce the story text or its illustrations
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Story script request failed: {0}")]
    ScriptRequest(#[source] GatewayError),

    #[error("Story script was malformed: {0}")]
    MalformedScript(#[from] ScriptParseError),

    #[error("Reference illustration (page 1) failed: {0}")]
    ReferenceImage(#[source] GatewayError),

    #[error("Illustration for page {page} failed: {source}")]
    PageImage { page: usize, source: GatewayError },

    #[error("Generated pages do not form a book: {0}")]
    InvalidBook(#[from] DomainError),
}

impl GenerationError {
    /// The page an illustration error belongs to, if any
    pub fn page(&self) -> Option<usize> {
        match self {
            GenerationError::ReferenceImage(_) => Some(1),
            GenerationError::PageImage { page, .. } => Some(*page),
            _ => None,
        }
    }
}

/// Failure of a whole book run
#[derive(Error, Debug)]
pub enum GenerateBookError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
