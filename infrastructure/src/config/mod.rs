//! Configuration loading for storybook
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `STORYBOOK_*` environment variables (`__` separates sections,
//!    e.g. `STORYBOOK_MODELS__IMAGE`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./storybook.toml` or `./.storybook.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/storybook/config.toml`
//! 5. Default values
//!
//! A `.env` file in the working directory is loaded into the process
//! environment first, so the API key can live there.

mod file_config;
mod loader;
mod validation;

pub use file_config::{
    FileConfig, FileGenerationConfig, FileModelsConfig, FileOutputConfig, FileProviderConfig,
};
pub use loader::{ConfigError, ConfigLoader};
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
