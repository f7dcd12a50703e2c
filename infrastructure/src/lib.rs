//! Infrastructure layer for storybook
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod openrouter;
pub mod storage;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigIssue, ConfigLoader, FileConfig, FileGenerationConfig, FileModelsConfig,
    FileOutputConfig, FileProviderConfig, Severity,
};
pub use openrouter::{
    error::OpenRouterError,
    gateway::{OpenRouterGateway, OpenRouterSettings},
};
pub use storage::fs_repository::FsBookRepository;
