//! StoryPrompt value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// The user's story idea (Value Object)
///
/// Immutable once submitted. Whitespace-only input is rejected so that no
/// network call is ever made for an empty prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StoryPrompt {
    content: String,
}

impl StoryPrompt {
    /// Create a prompt, trimming surrounding whitespace
    pub fn new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyPrompt);
        }
        Ok(Self {
            content: trimmed.to_string(),
        })
    }

    /// Get the prompt content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for StoryPrompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<String> for StoryPrompt {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        StoryPrompt::new(s)
    }
}

impl TryFrom<&str> for StoryPrompt {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        StoryPrompt::new(s)
    }
}

impl From<StoryPrompt> for String {
    fn from(prompt: StoryPrompt) -> Self {
        prompt.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_creation() {
        let p = StoryPrompt::new("A mouse who finds the moon cheese").unwrap();
        assert_eq!(p.content(), "A mouse who finds the moon cheese");
    }

    #[test]
    fn test_prompt_is_trimmed() {
        let p = StoryPrompt::new("  a brave turtle \n").unwrap();
        assert_eq!(p.content(), "a brave turtle");
    }

    #[test]
    fn test_empty_prompt_rejected() {
        assert_eq!(StoryPrompt::new(""), Err(DomainError::EmptyPrompt));
        assert_eq!(StoryPrompt::new("   \t"), Err(DomainError::EmptyPrompt));
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        assert!(serde_json::from_str::<StoryPrompt>("\"  \"").is_err());
        let p: StoryPrompt = serde_json::from_str("\"owls\"").unwrap();
        assert_eq!(p.content(), "owls");
    }
}
