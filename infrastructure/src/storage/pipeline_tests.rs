//! End-to-end runs of the book pipeline against the filesystem repository

use super::fs_repository::FsBookRepository;
use async_trait::async_trait;
use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use storybook_application::{
    BookRepository, GatewayError, GenerateBookError, GenerateBookInput, GenerateBookUseCase,
    GenerationError, GenerationParams, ImageRequest, LlmGateway, TextRequest,
};
use storybook_domain::{ImageFormat, PageImage, StoryPrompt};

/// Replies with a fixed number of `Page N:` lines and solid-colour PNGs
struct StubGateway {
    pages: usize,
    image_calls: AtomicUsize,
}

impl StubGateway {
    fn new(pages: usize) -> Self {
        Self {
            pages,
            image_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl LlmGateway for StubGateway {
    async fn complete_text(&self, _request: TextRequest<'_>) -> Result<String, GatewayError> {
        Ok((1..=self.pages)
            .map(|n| format!("Page {}: The owl blinks {} times.", n, n))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    async fn generate_image(&self, _request: ImageRequest<'_>) -> Result<PageImage, GatewayError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([10, 20, 30]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png)
            .map_err(|e| GatewayError::Other(e.to_string()))?;
        Ok(PageImage::new(out.into_inner(), ImageFormat::Png))
    }
}

fn use_case(
    gateway: &Arc<StubGateway>,
    repo: &Arc<FsBookRepository>,
) -> GenerateBookUseCase<StubGateway, FsBookRepository> {
    GenerateBookUseCase::new(
        Arc::clone(gateway),
        Arc::clone(repo),
        GenerationParams::default(),
    )
}

#[tokio::test]
async fn test_generated_book_reads_back() {
    let tmp = tempfile::tempdir().unwrap();
    let gateway = Arc::new(StubGateway::new(10));
    let repo = Arc::new(FsBookRepository::new(tmp.path()));

    let output = use_case(&gateway, &repo)
        .execute(GenerateBookInput::new(StoryPrompt::new("a sleepy owl").unwrap()))
        .await
        .unwrap();

    let stored = repo.load(&output.saved.dir).unwrap();
    assert_eq!(stored.manifest.pages.len(), 10);
    for (i, page) in stored.pages.iter().enumerate() {
        assert_eq!(page.entry.page_number, i + 1);
        assert_eq!(page.entry.image_file, format!("page_{:02}.png", i + 1));
        assert!(page.dimensions.is_some());
    }
    assert_eq!(repo.latest().unwrap(), Some(output.saved.dir));
}

#[tokio::test]
async fn test_short_or_long_script_creates_no_directory() {
    for pages in [9, 11] {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("generated_books");
        let gateway = Arc::new(StubGateway::new(pages));
        let repo = Arc::new(FsBookRepository::new(&root));

        let err = use_case(&gateway, &repo)
            .execute(GenerateBookInput::new(StoryPrompt::new("a sleepy owl").unwrap()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GenerateBookError::Generation(GenerationError::MalformedScript(_))
        ));
        assert_eq!(gateway.image_calls.load(Ordering::SeqCst), 0);
        assert!(!root.exists());
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }
}
