//! Generation parameters: explicit configuration for the generators.
//!
//! [`GenerationParams`] is handed to
//! [`GenerateScriptUseCase`](crate::use_cases::generate_script::GenerateScriptUseCase) and
//! [`IllustrateBookUseCase`](crate::use_cases::illustrate_book::IllustrateBookUseCase)
//! at construction. Nothing here is read from process-global state.

use serde::{Deserialize, Serialize};
use storybook_domain::Model;

/// Models and sampling parameters for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Model that writes the ten-page script.
    pub text_model: Model,
    /// Model that draws the illustrations.
    pub image_model: Model,
    /// Sampling temperature for the script request.
    pub temperature: f32,
    /// How many of the pages 2-10 may be illustrated at once.
    /// `1` keeps the calls strictly sequential.
    pub illustration_concurrency: usize,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            text_model: Model::default_text(),
            image_model: Model::default_image(),
            temperature: 0.7,
            illustration_concurrency: 1,
        }
    }
}

impl GenerationParams {
    // ==================== Builder Methods ====================

    pub fn with_text_model(mut self, model: Model) -> Self {
        self.text_model = model;
        self
    }

    pub fn with_image_model(mut self, model: Model) -> Self {
        self.image_model = model;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Zero is treated as one.
    pub fn with_illustration_concurrency(mut self, concurrency: usize) -> Self {
        self.illustration_concurrency = concurrency.max(1);
        self
    }
}
