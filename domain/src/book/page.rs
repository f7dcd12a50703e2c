//! Page-level value objects

use super::PAGE_COUNT;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// 1-based page index within a book (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct PageNumber(usize);

impl PageNumber {
    /// The first page; its illustration becomes the style reference.
    pub const FIRST: PageNumber = PageNumber(1);

    pub fn new(number: usize) -> Result<Self, DomainError> {
        if (1..=PAGE_COUNT).contains(&number) {
            Ok(Self(number))
        } else {
            Err(DomainError::PageNumberOutOfRange(number))
        }
    }

    /// All page numbers of a book, in order
    pub fn all() -> impl Iterator<Item = PageNumber> {
        (1..=PAGE_COUNT).map(PageNumber)
    }

    pub fn get(self) -> usize {
        self.0
    }

    pub fn is_first(self) -> bool {
        self == Self::FIRST
    }

    /// File name of this page's illustration: `page_01.png` .. `page_10.png`
    pub fn image_file_name(self) -> String {
        format!("page_{:02}.png", self.0)
    }
}

impl std::fmt::Display for PageNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<usize> for PageNumber {
    type Error = DomainError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        PageNumber::new(n)
    }
}

impl From<PageNumber> for usize {
    fn from(n: PageNumber) -> Self {
        n.0
    }
}

/// The 1-2 sentences of story text printed on one page (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText(String);

impl PageText {
    /// Create page text, trimming whitespace. `page` is only used for the error.
    pub fn new(page: usize, text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyPageText(page));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for PageText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Encoding of a generated illustration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Webp,
}

impl ImageFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Webp => "image/webp",
        }
    }

    /// Parse a MIME type such as `image/png` (parameters are ignored)
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/png" => Some(ImageFormat::Png),
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/webp" => Some(ImageFormat::Webp),
            _ => None,
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mime_type())
    }
}

/// Binary illustration for one page (Value Object)
///
/// The page-1 image doubles as the style reference for every later page and
/// is only ever passed by shared reference.
#[derive(Clone, PartialEq, Eq)]
pub struct PageImage {
    bytes: Vec<u8>,
    format: ImageFormat,
}

impl PageImage {
    pub fn new(bytes: Vec<u8>, format: ImageFormat) -> Self {
        Self { bytes, format }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl std::fmt::Debug for PageImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageImage")
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}
