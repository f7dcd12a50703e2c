//! Book repository port
//!
//! Defines how finished books are written to and read back from storage.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use storybook_domain::{Book, BookManifest, ManifestPage};
use thiserror::Error;

/// Errors that can occur while persisting or loading a book
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Could not create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Book directory already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("No book found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("Could not encode page {page} as PNG: {message}")]
    Encode { page: usize, message: String },

    #[error("Manifest serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid manifest in {}: {reason}", path.display())]
    InvalidManifest { path: PathBuf, reason: String },
}

/// A book that has been written to storage
#[derive(Debug, Clone)]
pub struct SavedBook {
    /// Directory holding the manifest and page images
    pub dir: PathBuf,
    pub manifest: BookManifest,
}

/// Pixel size of a stored page image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// One page as found on disk
#[derive(Debug, Clone)]
pub struct StoredPage {
    pub entry: ManifestPage,
    /// `None` when the image file is missing or unreadable
    pub dimensions: Option<ImageDimensions>,
}

/// A book read back from storage
#[derive(Debug, Clone)]
pub struct StoredBook {
    pub dir: PathBuf,
    pub manifest: BookManifest,
    pub pages: Vec<StoredPage>,
}

impl StoredBook {
    /// Pages whose image file could not be found
    pub fn missing_images(&self) -> impl Iterator<Item = &StoredPage> {
        self.pages.iter().filter(|p| p.dimensions.is_none())
    }
}

/// Storage for finished books
///
/// Implementations write one self-contained directory per book. `save` runs
/// inside the generation pipeline and must not block the async runtime;
/// `load` and `latest` are called from synchronous code and may block.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Write the page images and manifest; returns where the book landed
    async fn save(&self, book: &Book) -> Result<SavedBook, PersistenceError>;

    /// Read a book directory back
    fn load(&self, dir: &Path) -> Result<StoredBook, PersistenceError>;

    /// The most recently generated book, if any
    fn latest(&self) -> Result<Option<PathBuf>, PersistenceError>;
}
