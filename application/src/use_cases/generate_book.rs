//! Generate Book use case
//!
//! Runs the whole pipeline for one prompt:
//! script → reference image → pages 2-10 → assembled book → persisted folder.
//! Every stage transition goes through a [`GenerationRun`], so a stage can
//! never be skipped and any error leaves the run in `Failed`.

use super::errors::{GenerateBookError, GenerationError};
use super::generate_script::GenerateScriptUseCase;
use super::illustrate_book::IllustrateBookUseCase;
use crate::config::GenerationParams;
use crate::ports::book_repository::{BookRepository, SavedBook};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{GenerationPhase, GenerationProgress, NoProgress};
use chrono::{DateTime, SubsecRound, Utc};
use std::sync::Arc;
use storybook_domain::{Book, GenerationRun, RunStage, StoryPrompt};
use tracing::{error, info};

/// Input for the GenerateBook use case
#[derive(Debug, Clone)]
pub struct GenerateBookInput {
    pub prompt: StoryPrompt,
    /// Timestamp recorded in the manifest and used for the folder name.
    /// Defaults to the moment the run starts.
    pub generated_at: Option<DateTime<Utc>>,
}

impl GenerateBookInput {
    pub fn new(prompt: StoryPrompt) -> Self {
        Self {
            prompt,
            generated_at: None,
        }
    }

    pub fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }
}

/// Result of a successful run
#[derive(Debug)]
pub struct GenerateBookOutput {
    pub book: Book,
    pub saved: SavedBook,
    pub run: GenerationRun,
}

/// Use case for generating and persisting a complete book
pub struct GenerateBookUseCase<G: LlmGateway + 'static, R: BookRepository + ?Sized> {
    script: GenerateScriptUseCase<G>,
    illustrator: IllustrateBookUseCase<G>,
    repository: Arc<R>,
}

impl<G: LlmGateway + 'static, R: BookRepository + ?Sized> GenerateBookUseCase<G, R> {
    pub fn new(gateway: Arc<G>, repository: Arc<R>, params: GenerationParams) -> Self {
        Self {
            script: GenerateScriptUseCase::new(Arc::clone(&gateway), params.clone()),
            illustrator: IllustrateBookUseCase::new(gateway, params),
            repository,
        }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: GenerateBookInput,
    ) -> Result<GenerateBookOutput, GenerateBookError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: GenerateBookInput,
        progress: &dyn GenerationProgress,
    ) -> Result<GenerateBookOutput, GenerateBookError> {
        let mut run = GenerationRun::new();
        progress.on_stage_entered(run.stage());

        match self.run_stages(&input, &mut run, progress).await {
            Ok((book, saved)) => {
                info!(dir = %saved.dir.display(), "Book generated");
                Ok(GenerateBookOutput { book, saved, run })
            }
            Err(e) => {
                error!(stage = run.stage().as_str(), error = %e, "Book generation failed");
                // run_stages never leaves the run in a terminal stage on error
                let _ = run.fail(e.to_string());
                progress.on_stage_entered(run.stage());
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        input: &GenerateBookInput,
        run: &mut GenerationRun,
        progress: &dyn GenerationProgress,
    ) -> Result<(Book, SavedBook), GenerateBookError> {
        let prompt = &input.prompt;
        let generated_at = input
            .generated_at
            .unwrap_or_else(Utc::now)
            .trunc_subsecs(0);
        info!(prompt = %prompt, "Starting book generation");

        // Stage 1: script
        progress.on_phase_start(GenerationPhase::Script, 1);
        let texts = self.script.execute(prompt).await?;
        progress.on_phase_complete(GenerationPhase::Script);
        Self::advance(run, RunStage::ScriptGenerated, progress)?;

        // Stage 2: reference image
        let reference = self
            .illustrator
            .reference(prompt, &texts[0], progress)
            .await?;
        Self::advance(run, RunStage::Image1Generated, progress)?;

        // Stage 3: pages 2-10 against the reference
        let rest = self
            .illustrator
            .styled_pages(prompt, &texts, &reference, progress)
            .await?;
        Self::advance(run, RunStage::ImagesComplete, progress)?;

        let mut images = Vec::with_capacity(texts.len());
        images.push(reference);
        images.extend(rest);
        let book = Book::assemble(prompt.clone(), generated_at, texts, images)
            .map_err(GenerationError::from)?;

        // Stage 4: persist
        progress.on_phase_start(GenerationPhase::Saving, 1);
        let saved = self.repository.save(&book).await?;
        progress.on_phase_complete(GenerationPhase::Saving);
        Self::advance(run, RunStage::Persisted, progress)?;

        Ok((book, saved))
    }

    fn advance(
        run: &mut GenerationRun,
        stage: RunStage,
        progress: &dyn GenerationProgress,
    ) -> Result<(), GenerationError> {
        run.advance(stage)?;
        progress.on_stage_entered(stage);
        Ok(())
    }
}
