//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Story prompt cannot be empty")]
    EmptyPrompt,

    #[error("Page number {0} is out of range (expected 1-{max})", max = crate::book::PAGE_COUNT)]
    PageNumberOutOfRange(usize),

    #[error("Page {0} has empty text")]
    EmptyPageText(usize),

    #[error("Page {0} has no image data")]
    EmptyImage(usize),

    #[error("A book needs exactly {expected} pages, got {actual}")]
    WrongPageCount { expected: usize, actual: usize },

    #[error("Pages must be numbered 1-{max} in order: expected page {expected}, found page {found}", max = crate::book::PAGE_COUNT)]
    PageOutOfOrder { expected: usize, found: usize },

    #[error("Page {page} should use image file {expected}, found {found}")]
    UnexpectedImageFile {
        page: usize,
        expected: String,
        found: String,
    },

    #[error("Invalid stage transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}
