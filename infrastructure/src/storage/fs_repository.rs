//! Filesystem book repository
//!
//! Layout of one book:
//!
//! ```text
//! <root>/book_20251005_143022/
//!   page_01.png .. page_10.png
//!   book_data.json
//! ```
//!
//! A book is written into a uniquely named hidden `.book_*.partial` sibling
//! and renamed into place once every file is on disk, so a failed save never
//! leaves a half-written book directory behind. Each save only ever removes
//! the staging directory it created itself.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use image::ImageFormat as CodecFormat;
use std::borrow::Cow;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use storybook_application::{
    BookRepository, ImageDimensions, PersistenceError, SavedBook, StoredBook, StoredPage,
};
use storybook_domain::{Book, BookManifest, ImageFormat, MANIFEST_FILE_NAME, Page};
use tracing::{debug, info};

const BOOK_DIR_PREFIX: &str = "book_";
const STAGING_PREFIX: &str = ".book_";
const STAGING_SUFFIX: &str = ".partial";

/// Stores each book as a directory of PNGs plus a JSON manifest
#[derive(Debug, Clone)]
pub struct FsBookRepository {
    root: PathBuf,
}

impl FsBookRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `book_YYYYMMDD_HHMMSS`, which sorts chronologically
    pub fn book_dir_name(at: DateTime<Utc>) -> String {
        format!("{}{}", BOOK_DIR_PREFIX, at.format("%Y%m%d_%H%M%S"))
    }

    fn write_contents(
        dir: &Path,
        book: &Book,
        manifest: &BookManifest,
    ) -> Result<(), PersistenceError> {
        for page in book.pages() {
            let path = dir.join(page.number.image_file_name());
            let png = png_bytes(page)?;
            fs::write(&path, png.as_ref()).map_err(|source| PersistenceError::Write {
                path: path.clone(),
                source,
            })?;
            debug!(page = page.number.get(), path = %path.display(), "Wrote page image");
        }

        let path = dir.join(MANIFEST_FILE_NAME);
        let json = manifest.to_json_pretty()?;
        fs::write(&path, json).map_err(|source| PersistenceError::Write { path, source })
    }

    /// Blocking write of a complete book directory
    pub fn write_book(&self, book: &Book) -> Result<SavedBook, PersistenceError> {
        fs::create_dir_all(&self.root).map_err(|source| PersistenceError::CreateDir {
            path: self.root.clone(),
            source,
        })?;

        let target = self.root.join(Self::book_dir_name(book.generated_at()));
        if target.exists() {
            return Err(PersistenceError::AlreadyExists(target));
        }

        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(STAGING_SUFFIX)
            .tempdir_in(&self.root)
            .map_err(|source| PersistenceError::CreateDir {
                path: self.root.clone(),
                source,
            })?;
        debug!(path = %staging.path().display(), "Staging book");

        // dropping `staging` on error removes it
        let manifest = BookManifest::from_book(book);
        Self::write_contents(staging.path(), book, &manifest)?;
        if target.exists() {
            return Err(PersistenceError::AlreadyExists(target));
        }

        let staging = staging.keep();
        if let Err(source) = fs::rename(&staging, &target) {
            let _ = fs::remove_dir_all(&staging);
            return Err(PersistenceError::Write {
                path: target,
                source,
            });
        }

        info!(path = %target.display(), "Book saved");
        Ok(SavedBook {
            dir: target,
            manifest,
        })
    }
}

#[async_trait]
impl BookRepository for FsBookRepository {
    async fn save(&self, book: &Book) -> Result<SavedBook, PersistenceError> {
        let repo = self.clone();
        let book = book.clone();
        tokio::task::spawn_blocking(move || repo.write_book(&book))
            .await
            .map_err(|e| PersistenceError::Write {
                path: self.root.clone(),
                source: std::io::Error::other(e),
            })?
    }

    fn load(&self, dir: &Path) -> Result<StoredBook, PersistenceError> {
        let manifest_path = dir.join(MANIFEST_FILE_NAME);
        if !manifest_path.is_file() {
            return Err(PersistenceError::NotFound(dir.to_path_buf()));
        }

        let json = fs::read_to_string(&manifest_path).map_err(|source| PersistenceError::Read {
            path: manifest_path.clone(),
            source,
        })?;
        let invalid = |reason: String| PersistenceError::InvalidManifest {
            path: manifest_path.clone(),
            reason,
        };
        let manifest = BookManifest::from_json(&json).map_err(|e| invalid(e.to_string()))?;
        manifest.validate().map_err(|e| invalid(e.to_string()))?;

        let pages = manifest
            .pages
            .iter()
            .map(|entry| {
                let path = dir.join(&entry.image_file);
                let dimensions = match image::image_dimensions(&path) {
                    Ok((width, height)) => Some(ImageDimensions { width, height }),
                    Err(e) => {
                        debug!(path = %path.display(), error = %e, "Page image unavailable");
                        None
                    }
                };
                StoredPage {
                    entry: entry.clone(),
                    dimensions,
                }
            })
            .collect();

        Ok(StoredBook {
            dir: dir.to_path_buf(),
            manifest,
            pages,
        })
    }

    fn latest(&self) -> Result<Option<PathBuf>, PersistenceError> {
        if !self.root.is_dir() {
            return Ok(None);
        }

        let entries = fs::read_dir(&self.root).map_err(|source| PersistenceError::Read {
            path: self.root.clone(),
            source,
        })?;

        let latest = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.starts_with(BOOK_DIR_PREFIX))
            .max();

        Ok(latest.map(|name| self.root.join(name)))
    }
}

/// PNG bytes for a page, transcoding other formats
fn png_bytes(page: &Page) -> Result<Cow<'_, [u8]>, PersistenceError> {
    let image = &page.image;
    let source_format = match image.format() {
        ImageFormat::Png => return Ok(Cow::Borrowed(image.bytes())),
        ImageFormat::Jpeg => CodecFormat::Jpeg,
        ImageFormat::Webp => CodecFormat::WebP,
    };

    let encode_error = |e: image::ImageError| PersistenceError::Encode {
        page: page.number.get(),
        message: e.to_string(),
    };
    let decoded =
        image::load_from_memory_with_format(image.bytes(), source_format).map_err(encode_error)?;

    let mut out = Cursor::new(Vec::new());
    decoded
        .write_to(&mut out, CodecFormat::Png)
        .map_err(encode_error)?;
    debug!(page = page.number.get(), from = %image.format(), "Transcoded page image to PNG");
    Ok(Cow::Owned(out.into_inner()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use image::{Rgb, RgbImage};
    use storybook_domain::{PageImage, PageText, StoryPrompt};

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn encoded(format: CodecFormat, width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([200, 120, 40]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 5, 14, 30, 22).unwrap()
    }

    fn book_with(images: Vec<PageImage>) -> Book {
        let texts = (1..=10)
            .map(|n| PageText::new(n, format!("Página {} del búho.", n)).unwrap())
            .collect();
        Book::assemble(StoryPrompt::new("a sleepy owl").unwrap(), at(), texts, images).unwrap()
    }

    fn png_book() -> Book {
        let png = encoded(CodecFormat::Png, 8, 6);
        book_with(vec![PageImage::new(png, ImageFormat::Png); 10])
    }

    #[test]
    fn test_book_dir_name() {
        assert_eq!(FsBookRepository::book_dir_name(at()), "book_20251005_143022");
    }

    #[test]
    fn test_save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = FsBookRepository::new(tmp.path().join("generated_books"));

        let saved = repo.write_book(&png_book()).unwrap();
        assert_eq!(saved.dir, repo.root().join("book_20251005_143022"));

        let stored = repo.load(&saved.dir).unwrap();
        assert_eq!(stored.manifest, saved.manifest);
        assert_eq!(stored.pages.len(), 10);
        for (i, page) in stored.pages.iter().enumerate() {
            assert_eq!(page.entry.page_number, i + 1);
            assert_eq!(page.entry.image_file, format!("page_{:02}.png", i + 1));
            assert_eq!(
                page.dimensions,
                Some(ImageDimensions {
                    width: 8,
                    height: 6
                })
            );
        }
        assert_eq!(stored.missing_images().count(), 0);
    }

    #[test]
    fn test_manifest_is_pretty_utf8() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = FsBookRepository::new(tmp.path());

        let saved = repo.write_book(&png_book()).unwrap();
        let json = fs::read_to_string(saved.dir.join(MANIFEST_FILE_NAME)).unwrap();

        assert!(json.contains("Página 1 del búho."));
        assert!(json.contains("\n  \"pages\": ["));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert!(keys.contains(&"prompt"));
        assert!(keys.contains(&"generated_at"));
        assert!(keys.contains(&"pages"));
    }

    #[test]
    fn test_no_staging_directory_left_behind() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = FsBookRepository::new(tmp.path());
        repo.write_book(&png_book()).unwrap();

        let names: Vec<String> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["book_20251005_143022".to_string()]);
    }

    #[test]
    fn test_existing_directory_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = FsBookRepository::new(tmp.path());
        repo.write_book(&png_book()).unwrap();

        let err = repo.write_book(&png_book()).unwrap_err();
        assert!(matches!(err, PersistenceError::AlreadyExists(_)));
    }

    #[test]
    fn test_save_leaves_other_staging_directories_alone() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = FsBookRepository::new(tmp.path());
        let in_flight = tmp.path().join(".book_20251005_143022.partial");
        fs::create_dir(&in_flight).unwrap();
        fs::write(in_flight.join("page_01.png"), PNG_MAGIC).unwrap();

        let saved = repo.write_book(&png_book()).unwrap();

        assert_eq!(saved.dir, tmp.path().join("book_20251005_143022"));
        assert!(in_flight.join("page_01.png").is_file());
        let mut names: Vec<String> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                ".book_20251005_143022.partial".to_string(),
                "book_20251005_143022".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_save_through_port() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = FsBookRepository::new(tmp.path());

        let saved = BookRepository::save(&repo, &png_book()).await.unwrap();

        assert!(saved.dir.join("page_10.png").is_file());
        assert!(saved.dir.join(MANIFEST_FILE_NAME).is_file());
    }

    #[test]
    fn test_jpeg_pages_are_stored_as_png() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = FsBookRepository::new(tmp.path());
        let jpeg = PageImage::new(encoded(CodecFormat::Jpeg, 5, 4), ImageFormat::Jpeg);

        let saved = repo.write_book(&book_with(vec![jpeg; 10])).unwrap();

        let bytes = fs::read(saved.dir.join("page_03.png")).unwrap();
        assert!(bytes.starts_with(PNG_MAGIC));
        assert_eq!(image::image_dimensions(saved.dir.join("page_03.png")).unwrap(), (5, 4));
    }

    #[test]
    fn test_undecodable_image_fails_without_leaving_a_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = FsBookRepository::new(tmp.path());
        let garbage = PageImage::new(vec![0xFF, 0xD8, 0xFF, 0x00, 0x01], ImageFormat::Jpeg);

        let err = repo.write_book(&book_with(vec![garbage; 10])).unwrap_err();

        assert!(matches!(err, PersistenceError::Encode { page: 1, .. }));
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_load_reports_missing_images() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = FsBookRepository::new(tmp.path());
        let saved = repo.write_book(&png_book()).unwrap();
        fs::remove_file(saved.dir.join("page_07.png")).unwrap();

        let stored = repo.load(&saved.dir).unwrap();
        let missing: Vec<usize> = stored.missing_images().map(|p| p.entry.page_number).collect();
        assert_eq!(missing, vec![7]);
    }

    #[test]
    fn test_load_missing_and_invalid_manifests() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = FsBookRepository::new(tmp.path());

        let err = repo.load(&tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, PersistenceError::NotFound(_)));

        let dir = tmp.path().join("book_20250101_000000");
        fs::create_dir(&dir).unwrap();
        fs::write(
            dir.join(MANIFEST_FILE_NAME),
            r#"{"prompt":"x","generated_at":"2025-01-01T00:00:00","pages":[]}"#,
        )
        .unwrap();
        let err = repo.load(&dir).unwrap_err();
        assert!(matches!(err, PersistenceError::InvalidManifest { .. }));
    }

    #[test]
    fn test_latest_picks_newest_book_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = FsBookRepository::new(tmp.path());
        assert_eq!(repo.latest().unwrap(), None);

        for name in [
            "book_20250101_090000",
            "book_20251005_143022",
            "book_20240615_120000",
            ".book_20991231_000000.partial",
            "notes",
        ] {
            fs::create_dir(tmp.path().join(name)).unwrap();
        }
        fs::write(tmp.path().join("book_20991231_235959"), b"not a dir").unwrap();

        assert_eq!(
            repo.latest().unwrap(),
            Some(tmp.path().join("book_20251005_143022"))
        );
    }

    #[test]
    fn test_latest_without_root() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = FsBookRepository::new(tmp.path().join("missing"));
        assert_eq!(repo.latest().unwrap(), None);
    }
}
