//! Application layer for storybook
//!
//! This crate contains use cases, port definitions, and generation
//! parameters. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::GenerationParams;
pub use ports::{
    book_repository::{
        BookRepository, ImageDimensions, PersistenceError, SavedBook, StoredBook, StoredPage,
    },
    llm_gateway::{GatewayError, ImageRequest, LlmGateway, TextRequest},
    progress::{GenerationPhase, GenerationProgress, NoProgress},
};
pub use use_cases::errors::{GenerateBookError, GenerationError};
pub use use_cases::generate_book::{GenerateBookInput, GenerateBookOutput, GenerateBookUseCase};
pub use use_cases::generate_script::GenerateScriptUseCase;
pub use use_cases::illustrate_book::IllustrateBookUseCase;
