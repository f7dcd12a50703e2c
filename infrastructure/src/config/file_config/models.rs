//! Model selection from TOML (`[models]` section)

use crate::config::validation::{ConfigIssue, ConfigIssueCode, Severity};
use serde::{Deserialize, Serialize};
use storybook_domain::Model;

/// Model configuration from TOML
///
/// # Example
///
/// ```toml
/// [models]
/// text = "google/gemini-2.5-flash-preview-09-2025"   # Story script
/// image = "google/gemini-2.5-flash-image-preview"    # Illustrations
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    /// Model for the story script
    pub text: Option<String>,
    /// Model for the page illustrations
    pub image: Option<String>,
}

impl FileModelsConfig {
    /// Parse a single model string, collecting issues for empty names.
    fn parse_single_model(
        field: &str,
        value: Option<&String>,
    ) -> (Option<Model>, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        match value {
            None => (None, issues),
            Some(s) if s.trim().is_empty() => {
                issues.push(ConfigIssue {
                    severity: Severity::Error,
                    code: ConfigIssueCode::EmptyModelName {
                        field: field.to_string(),
                    },
                    message: format!("models.{}: model name cannot be empty", field),
                });
                (None, issues)
            }
            Some(s) => (Some(Model::from(s.as_str())), issues),
        }
    }

    pub fn parse_text(&self) -> (Option<Model>, Vec<ConfigIssue>) {
        Self::parse_single_model("text", self.text.as_ref())
    }

    pub fn parse_image(&self) -> (Option<Model>, Vec<ConfigIssue>) {
        let (model, mut issues) = Self::parse_single_model("image", self.image.as_ref());
        if let Some(m) = &model
            && !m.is_image_capable()
        {
            issues.push(ConfigIssue {
                severity: Severity::Warning,
                code: ConfigIssueCode::UnverifiedImageModel {
                    model: m.to_string(),
                },
                message: format!(
                    "models.image: '{}' is not a known image model; it must support image output",
                    m
                ),
            });
        }
        (model, issues)
    }

    /// Text model, falling back to the default
    pub fn text_model(&self) -> Model {
        self.parse_text().0.unwrap_or_else(Model::default_text)
    }

    /// Image model, falling back to the default
    pub fn image_model(&self) -> Model {
        self.parse_image().0.unwrap_or_else(Model::default_image)
    }
}
