//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod generation;
mod models;
mod output;
mod provider;

pub use generation::FileGenerationConfig;
pub use models::FileModelsConfig;
pub use output::FileOutputConfig;
pub use provider::FileProviderConfig;

use crate::config::validation::{ConfigIssue, ConfigIssueCode, Severity};
use serde::{Deserialize, Serialize};
use storybook_application::GenerationParams;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Text and image model selection
    pub models: FileModelsConfig,
    /// API endpoint and credentials
    pub provider: FileProviderConfig,
    /// Sampling and scheduling
    pub generation: FileGenerationConfig,
    /// Output location
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Model names
        issues.extend(self.models.parse_text().1);
        issues.extend(self.models.parse_image().1);

        // 2. Numeric ranges
        let temperature = self.generation.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            issues.push(ConfigIssue {
                severity: Severity::Error,
                code: ConfigIssueCode::OutOfRange {
                    field: "generation.temperature".to_string(),
                    value: temperature.to_string(),
                },
                message: format!(
                    "generation.temperature: {} is outside 0.0-2.0",
                    temperature
                ),
            });
        }
        if self.generation.illustration_concurrency == 0 {
            issues.push(ConfigIssue {
                severity: Severity::Warning,
                code: ConfigIssueCode::OutOfRange {
                    field: "generation.illustration_concurrency".to_string(),
                    value: "0".to_string(),
                },
                message: "generation.illustration_concurrency: 0 is treated as 1".to_string(),
            });
        }
        if self.provider.timeout_secs == 0 {
            issues.push(ConfigIssue {
                severity: Severity::Error,
                code: ConfigIssueCode::OutOfRange {
                    field: "provider.timeout_secs".to_string(),
                    value: "0".to_string(),
                },
                message: "provider.timeout_secs: must be at least 1".to_string(),
            });
        }

        issues
    }

    /// Parameters handed to the generators
    pub fn to_generation_params(&self) -> GenerationParams {
        GenerationParams::default()
            .with_text_model(self.models.text_model())
            .with_image_model(self.models.image_model())
            .with_temperature(self.generation.temperature)
            .with_illustration_concurrency(self.generation.illustration_concurrency)
    }
}
