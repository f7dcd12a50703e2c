//! Test doubles shared by the use case tests

use crate::ports::book_repository::{BookRepository, PersistenceError, SavedBook, StoredBook};
use crate::ports::llm_gateway::{GatewayError, ImageRequest, LlmGateway, TextRequest};
use crate::ports::progress::{GenerationPhase, GenerationProgress};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use storybook_domain::{
    Book, BookManifest, ImageFormat, Model, PageImage, PageNumber, PageText, RunStage,
};

pub fn script_reply(pages: usize) -> String {
    let mut reply = String::from("The Moon Cheese\n\n");
    for i in 1..=pages {
        reply.push_str(&format!("Page {}: Milo climbs step {}.\n", i, i));
    }
    reply
}

pub fn page_texts() -> Vec<PageText> {
    (1..=10)
        .map(|i| PageText::new(i, format!("Milo climbs step {}.", i)).unwrap())
        .collect()
}

#[derive(Debug, Clone)]
pub struct TextCall {
    pub model: Model,
    pub user_prompt: String,
}

#[derive(Debug, Clone)]
pub struct ImageCall {
    pub prompt: String,
    pub reference: Option<Vec<u8>>,
    pub response: Vec<u8>,
}

/// Gateway returning a canned script and a distinct PNG per image call
pub struct ScriptedGateway {
    script: Result<String, GatewayError>,
    fail_image_call: Option<usize>,
    text_calls: Mutex<Vec<TextCall>>,
    image_calls: Mutex<Vec<ImageCall>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::with_script(script_reply(10))
    }

    pub fn with_script(reply: String) -> Self {
        Self {
            script: Ok(reply),
            fail_image_call: None,
            text_calls: Mutex::new(Vec::new()),
            image_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_script_error(error: GatewayError) -> Self {
        Self {
            script: Err(error),
            ..Self::new()
        }
    }

    /// Make the n-th image call (1-based) fail
    pub fn fail_image_call(mut self, n: usize) -> Self {
        self.fail_image_call = Some(n);
        self
    }

    pub fn text_calls(&self) -> Vec<TextCall> {
        self.text_calls.lock().unwrap().clone()
    }

    pub fn image_calls(&self) -> Vec<ImageCall> {
        self.image_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn complete_text(&self, request: TextRequest<'_>) -> Result<String, GatewayError> {
        self.text_calls.lock().unwrap().push(TextCall {
            model: request.model.clone(),
            user_prompt: request.user_prompt.to_string(),
        });
        self.script.clone()
    }

    async fn generate_image(&self, request: ImageRequest<'_>) -> Result<PageImage, GatewayError> {
        let mut calls = self.image_calls.lock().unwrap();
        let n = calls.len() + 1;
        let failed = self.fail_image_call == Some(n);

        let mut response = b"\x89PNG\r\n\x1a\n".to_vec();
        if !failed {
            response.extend_from_slice(&(n as u32).to_be_bytes());
        }
        calls.push(ImageCall {
            prompt: request.prompt.to_string(),
            reference: request.reference.map(|r| r.bytes().to_vec()),
            response: response.clone(),
        });

        if failed {
            return Err(GatewayError::NoImage("scripted failure".to_string()));
        }
        Ok(PageImage::new(response, ImageFormat::Png))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    PhaseStart(GenerationPhase),
    Page(usize, bool),
    PhaseComplete(GenerationPhase),
    Stage(RunStage),
}

#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn failed_pages(&self) -> Vec<usize> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Page(page, false) => Some(page),
                _ => None,
            })
            .collect()
    }

    pub fn stages(&self) -> Vec<RunStage> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Stage(stage) => Some(stage),
                _ => None,
            })
            .collect()
    }
}

impl GenerationProgress for RecordingProgress {
    fn on_phase_start(&self, phase: GenerationPhase, _total_tasks: usize) {
        self.events.lock().unwrap().push(ProgressEvent::PhaseStart(phase));
    }

    fn on_page_complete(&self, _phase: GenerationPhase, page: PageNumber, success: bool) {
        self.events
            .lock()
            .unwrap()
            .push(ProgressEvent::Page(page.get(), success));
    }

    fn on_phase_complete(&self, phase: GenerationPhase) {
        self.events
            .lock()
            .unwrap()
            .push(ProgressEvent::PhaseComplete(phase));
    }

    fn on_stage_entered(&self, stage: RunStage) {
        self.events.lock().unwrap().push(ProgressEvent::Stage(stage));
    }
}

/// Repository keeping saved books in memory
#[derive(Default)]
pub struct InMemoryRepository {
    saved: Mutex<Vec<Book>>,
    fail: bool,
}

impl InMemoryRepository {
    pub fn failing() -> Self {
        Self {
            saved: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn saved(&self) -> Vec<Book> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookRepository for InMemoryRepository {
    async fn save(&self, book: &Book) -> Result<SavedBook, PersistenceError> {
        let dir = PathBuf::from(format!(
            "memory/book_{}",
            book.generated_at().format("%Y%m%d_%H%M%S")
        ));
        if self.fail {
            return Err(PersistenceError::CreateDir {
                path: dir,
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        self.saved.lock().unwrap().push(book.clone());
        Ok(SavedBook {
            dir,
            manifest: BookManifest::from_book(book),
        })
    }

    fn load(&self, dir: &Path) -> Result<StoredBook, PersistenceError> {
        Err(PersistenceError::NotFound(dir.to_path_buf()))
    }

    fn latest(&self) -> Result<Option<PathBuf>, PersistenceError> {
        Ok(None)
    }
}
