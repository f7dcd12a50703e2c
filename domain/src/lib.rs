//! Domain layer for storybook
//!
//! This crate contains the book aggregate, its value objects, script parsing
//! and prompt templates. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Book
//!
//! One generation run produces one [`Book`]: the user's [`StoryPrompt`], a
//! timestamp and exactly ten illustrated pages.
//!
//! ## Reference image
//!
//! The page-1 illustration is the style reference for pages 2-10. Every later
//! page is drawn against that same image, never against its predecessor, so
//! the style cannot drift page over page.

pub mod book;
pub mod core;
pub mod prompt;
pub mod script;

// Re-export commonly used types
pub use book::{
    PAGE_COUNT,
    entities::{Book, Page},
    manifest::{BookManifest, MANIFEST_FILE_NAME, ManifestPage},
    page::{ImageFormat, PageImage, PageNumber, PageText},
    run::{GenerationRun, RunStage},
};
pub use core::{error::DomainError, model::Model, prompt::StoryPrompt, string::preview};
pub use prompt::PromptTemplate;
pub use script::{ScriptParseError, parse_story_script};
