//! Ports (interfaces) for the application layer
//!
//! These traits define the boundaries between the application layer
//! and the infrastructure/presentation layers.

pub mod book_repository;
pub mod llm_gateway;
pub mod progress;
