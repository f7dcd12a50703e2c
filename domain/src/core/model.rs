//! Model value object representing an OpenRouter model identifier

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Models known to produce usable story scripts and illustrations (Value Object)
///
/// Any other identifier accepted by the provider is carried as [`Model::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    // Text models
    Gemini25FlashPreview,
    Gemini25Flash,
    Gpt4oMini,
    // Image-capable models
    Gemini25FlashImagePreview,
    Gemini25FlashImage,
    // Custom
    Custom(String),
}

impl Model {
    /// Get the provider identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gemini25FlashPreview => "google/gemini-2.5-flash-preview-09-2025",
            Model::Gemini25Flash => "google/gemini-2.5-flash",
            Model::Gpt4oMini => "openai/gpt-4o-mini",
            Model::Gemini25FlashImagePreview => "google/gemini-2.5-flash-image-preview",
            Model::Gemini25FlashImage => "google/gemini-2.5-flash-image",
            Model::Custom(s) => s,
        }
    }

    /// Default model for writing the story script
    pub fn default_text() -> Model {
        Model::Gemini25FlashPreview
    }

    /// Default model for illustrating pages
    pub fn default_image() -> Model {
        Model::Gemini25FlashImagePreview
    }

    /// Check if this model is known to return images
    ///
    /// Custom models are not rejected; the provider decides.
    pub fn is_image_capable(&self) -> bool {
        matches!(
            self,
            Model::Gemini25FlashImagePreview | Model::Gemini25FlashImage
        )
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim() {
            "google/gemini-2.5-flash-preview-09-2025" => Model::Gemini25FlashPreview,
            "google/gemini-2.5-flash" => Model::Gemini25Flash,
            "openai/gpt-4o-mini" => Model::Gpt4oMini,
            "google/gemini-2.5-flash-image-preview" => Model::Gemini25FlashImagePreview,
            "google/gemini-2.5-flash-image" => Model::Gemini25FlashImage,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(model) => model,
            Err(never) => match never {},
        }
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Model::from(s.as_str()))
    }
}
