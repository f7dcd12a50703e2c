//! The `book_data.json` record persisted next to the page images.
//!
//! Field names and the ten-element `pages` array are the on-disk contract:
//!
//! ```json
//! {
//!   "prompt": "a sleepy owl",
//!   "generated_at": "2025-10-05T14:30:22+00:00",
//!   "pages": [
//!     { "page_number": 1, "text": "...", "image_file": "page_01.png" }
//!   ]
//! }
//! ```

use super::PAGE_COUNT;
use super::entities::Book;
use super::page::PageNumber;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// File name of the manifest inside a book directory
pub const MANIFEST_FILE_NAME: &str = "book_data.json";

/// Per-page manifest entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestPage {
    pub page_number: usize,
    pub text: String,
    pub image_file: String,
}

/// Serialized form of a [`Book`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookManifest {
    pub prompt: String,
    /// ISO-8601 timestamp. Kept as a string so manifests written by other
    /// tools (e.g. without an offset) still load.
    pub generated_at: String,
    pub pages: Vec<ManifestPage>,
}

impl BookManifest {
    pub fn from_book(book: &Book) -> Self {
        Self {
            prompt: book.prompt().content().to_string(),
            generated_at: book.generated_at().to_rfc3339(),
            pages: book
                .pages()
                .iter()
                .map(|page| ManifestPage {
                    page_number: page.number.get(),
                    text: page.text.as_str().to_string(),
                    image_file: page.number.image_file_name(),
                })
                .collect(),
        }
    }

    /// Check the page count, numbering and file naming
    ///
    /// Image files must be named `page_NN.png`, which also keeps a manifest
    /// from pointing outside its own directory.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.pages.len() != PAGE_COUNT {
            return Err(DomainError::WrongPageCount {
                expected: PAGE_COUNT,
                actual: self.pages.len(),
            });
        }
        for (expected, page) in PageNumber::all().zip(&self.pages) {
            if page.page_number != expected.get() {
                return Err(DomainError::PageOutOfOrder {
                    expected: expected.get(),
                    found: page.page_number,
                });
            }
            if page.text.trim().is_empty() {
                return Err(DomainError::EmptyPageText(page.page_number));
            }
            let file_name = expected.image_file_name();
            if page.image_file != file_name {
                return Err(DomainError::UnexpectedImageFile {
                    page: page.page_number,
                    expected: file_name,
                    found: page.image_file.clone(),
                });
            }
        }
        Ok(())
    }

    /// Serialize as pretty-printed JSON (non-ASCII text is kept as-is)
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
