//! Application-level configuration.
//!
//! - [`GenerationParams`]: models and knobs the generators are built with

pub mod generation_params;

pub use generation_params::GenerationParams;
