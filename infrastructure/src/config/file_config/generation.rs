//! Generation settings from TOML (`[generation]` section)

use serde::{Deserialize, Serialize};

/// Sampling and scheduling settings
///
/// # Example
///
/// ```toml
/// [generation]
/// temperature = 0.7
/// illustration_concurrency = 3   # pages 2-10 drawn three at a time
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGenerationConfig {
    pub temperature: f32,
    pub illustration_concurrency: usize,
}

impl Default for FileGenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            illustration_concurrency: 1,
        }
    }
}
