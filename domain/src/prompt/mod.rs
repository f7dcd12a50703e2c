//! Prompt templates for story writing and illustration

pub mod template;

pub use template::PromptTemplate;
