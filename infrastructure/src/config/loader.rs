//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const APP_DIR: &str = "storybook";
const PROJECT_FILES: [&str; 2] = ["storybook.toml", ".storybook.toml"];
const ENV_PREFIX: &str = "STORYBOOK_";

/// Errors raised while resolving configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("API key not found: set {env} or provider.api_key")]
    MissingApiKey { env: String },
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `STORYBOOK_*` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./storybook.toml` or `./.storybook.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/storybook/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, ConfigError> {
        let global = Self::global_config_path().filter(|p| p.exists());
        let project = Self::project_config_path();

        Self::figment(global.as_deref(), project.as_deref(), config_path.map(|p| p.as_path()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::Figment(Box::new(e)))
    }

    /// Layer the TOML files over the defaults, lowest priority first
    fn figment(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        for path in [global, project, explicit].into_iter().flatten() {
            debug!(path = %path.display(), "Merging config file");
            figment = figment.merge(Toml::file(path));
        }

        figment
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Load `.env` from the working directory into the process environment
    ///
    /// Returns the file that was loaded, if any. Variables already set win.
    pub fn load_dotenv() -> Option<PathBuf> {
        match dotenvy::dotenv() {
            Ok(path) => {
                debug!(path = %path.display(), "Loaded .env");
                Some(path)
            }
            Err(e) => {
                if !e.not_found() {
                    debug!(error = %e, "Ignoring unreadable .env");
                }
                None
            }
        }
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/storybook/config.toml if set,
    /// otherwise the platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// API key for the configured provider
    pub fn api_key(config: &FileConfig) -> Result<String, ConfigError> {
        config
            .provider
            .resolve_api_key()
            .ok_or_else(|| ConfigError::MissingApiKey {
                env: config.provider.api_key_env.clone(),
            })
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(explicit: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        let env_vars: Vec<String> = std::env::vars()
            .map(|(k, _)| k)
            .filter(|k| k.starts_with(ENV_PREFIX))
            .collect();
        if env_vars.is_empty() {
            println!("  [     ] Env:     {}*", ENV_PREFIX);
        } else {
            println!("  [FOUND] Env:     {}", env_vars.join(", "));
        }

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<5}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./storybook.toml or ./.storybook.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [FOUND] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use storybook_domain::Model;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.models.text_model(), Model::default_text());
        assert_eq!(config.generation.illustration_concurrency, 1);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("storybook"));
    }

    #[test]
    fn test_later_files_override_earlier_ones() {
        let dir = tempfile::tempdir().unwrap();
        let global = write(
            dir.path(),
            "global.toml",
            "[models]\ntext = \"openai/gpt-4o-mini\"\n\n[generation]\nillustration_concurrency = 2\n",
        );
        let project = write(
            dir.path(),
            "project.toml",
            "[generation]\nillustration_concurrency = 4\n",
        );

        let config: FileConfig = ConfigLoader::figment(Some(&global), Some(&project), None)
            .extract()
            .unwrap();

        // project overrides only what it names
        assert_eq!(config.generation.illustration_concurrency, 4);
        assert_eq!(config.models.text_model(), Model::Gpt4oMini);
        assert_eq!(config.provider.timeout_secs, 120);
    }

    #[test]
    fn test_explicit_file_has_highest_file_priority() {
        let dir = tempfile::tempdir().unwrap();
        let project = write(dir.path(), "project.toml", "[output]\ndir = \"a\"\n");
        let explicit = write(dir.path(), "explicit.toml", "[output]\ndir = \"b\"\n");

        let config: FileConfig = ConfigLoader::figment(None, Some(&project), Some(&explicit))
            .extract()
            .unwrap();

        assert_eq!(config.output.dir, PathBuf::from("b"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write(
            dir.path(),
            "bad.toml",
            "[generation]\nillustration_concurrency = \"many\"\n",
        );

        let result: Result<FileConfig, _> = ConfigLoader::figment(None, None, Some(&bad)).extract();
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_api_key_names_the_variable() {
        let mut config = FileConfig::default();
        config.provider.api_key_env = "STORYBOOK_TEST_NO_SUCH_KEY".to_string();

        let err = ConfigLoader::api_key(&config).unwrap_err();
        assert!(err.to_string().contains("STORYBOOK_TEST_NO_SUCH_KEY"));
    }
}
