//! Provider configuration from TOML (`[provider]` section)

use serde::{Deserialize, Serialize};

/// OpenRouter (OpenAI-compatible) API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Base URL of the chat completions API.
    pub base_url: String,
    /// Environment variable holding the API key (default: "OPENROUTER_API_KEY").
    pub api_key_env: String,
    /// Direct API key. Prefer the env var.
    pub api_key: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Retries for connection errors, timeouts, HTTP 429 and 5xx.
    pub max_retries: u32,
    /// Backoff before the first retry; grows linearly per attempt.
    pub retry_backoff_ms: u64,
    /// Sent as the `X-Title` header for OpenRouter attribution.
    pub app_name: Option<String>,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            api_key: None,
            timeout_secs: 120,
            max_retries: 2,
            retry_backoff_ms: 1000,
            app_name: Some("storybook".to_string()),
        }
    }
}

impl FileProviderConfig {
    /// Resolve the API key: direct value first, then the named env var.
    ///
    /// Blank values count as unset.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}
