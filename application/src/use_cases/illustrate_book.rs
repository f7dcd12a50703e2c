//! Illustrate Book use case
//!
//! Draws the ten page illustrations, anchoring every page after the first to
//! the page-1 image:
//!
//! 1. Page 1 is drawn from its text alone. The result is the reference.
//! 2. Pages 2-10 are each drawn from their own text plus that same reference.
//!
//! Pages 2-10 only depend on the reference, so they may run with bounded
//! concurrency. Results always come back in page order.

use super::errors::GenerationError;
use crate::config::GenerationParams;
use crate::ports::llm_gateway::{GatewayError, ImageRequest, LlmGateway};
use crate::ports::progress::{GenerationPhase, GenerationProgress, NoProgress};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use storybook_domain::{
    DomainError, PAGE_COUNT, PageImage, PageNumber, PageText, PromptTemplate, StoryPrompt,
};
use tracing::{debug, info, warn};

/// Use case for drawing the page illustrations
pub struct IllustrateBookUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    params: GenerationParams,
}

impl<G: LlmGateway + 'static> IllustrateBookUseCase<G> {
    pub fn new(gateway: Arc<G>, params: GenerationParams) -> Self {
        Self { gateway, params }
    }

    /// Illustrate all ten pages with default (no-op) progress
    pub async fn execute(
        &self,
        prompt: &StoryPrompt,
        texts: &[PageText],
    ) -> Result<Vec<PageImage>, GenerationError> {
        self.execute_with_progress(prompt, texts, &NoProgress).await
    }

    /// Illustrate all ten pages, returning images in page order
    pub async fn execute_with_progress(
        &self,
        prompt: &StoryPrompt,
        texts: &[PageText],
        progress: &dyn GenerationProgress,
    ) -> Result<Vec<PageImage>, GenerationError> {
        if texts.len() != PAGE_COUNT {
            return Err(DomainError::WrongPageCount {
                expected: PAGE_COUNT,
                actual: texts.len(),
            }
            .into());
        }
        let reference = self.reference(prompt, &texts[0], progress).await?;
        let rest = self
            .styled_pages(prompt, texts, &reference, progress)
            .await?;

        let mut images = Vec::with_capacity(PAGE_COUNT);
        images.push(reference);
        images.extend(rest);
        Ok(images)
    }

    /// Draw page 1 with no reference; the result anchors every later page
    pub async fn reference(
        &self,
        prompt: &StoryPrompt,
        text: &PageText,
        progress: &dyn GenerationProgress,
    ) -> Result<PageImage, GenerationError> {
        info!(model = %self.params.image_model, "Establishing style with page 1");
        progress.on_phase_start(GenerationPhase::Illustrations, PAGE_COUNT);

        let result = self.draw(prompt, PageNumber::FIRST, text, None).await;
        progress.on_page_complete(
            GenerationPhase::Illustrations,
            PageNumber::FIRST,
            result.is_ok(),
        );

        result.map_err(|e| {
            warn!(error = %e, "Reference illustration failed; no further pages attempted");
            GenerationError::ReferenceImage(e)
        })
    }

    /// Draw pages 2-10 against `reference`
    ///
    /// `texts` holds all ten page texts; page 1's entry is skipped. The first
    /// failure aborts the remaining pages.
    pub async fn styled_pages(
        &self,
        prompt: &StoryPrompt,
        texts: &[PageText],
        reference: &PageImage,
        progress: &dyn GenerationProgress,
    ) -> Result<Vec<PageImage>, GenerationError> {
        if texts.len() != PAGE_COUNT {
            return Err(DomainError::WrongPageCount {
                expected: PAGE_COUNT,
                actual: texts.len(),
            }
            .into());
        }

        let concurrency = self.params.illustration_concurrency.max(1);
        debug!(concurrency, "Illustrating pages 2-{}", PAGE_COUNT);

        let images: Vec<PageImage> = stream::iter(PageNumber::all().zip(texts).skip(1))
            .map(|(page, text)| async move {
                let result = self.draw(prompt, page, text, Some(reference)).await;
                progress.on_page_complete(GenerationPhase::Illustrations, page, result.is_ok());
                result.map_err(|source| {
                    warn!(page = page.get(), error = %source, "Page illustration failed");
                    GenerationError::PageImage {
                        page: page.get(),
                        source,
                    }
                })
            })
            .buffered(concurrency)
            .try_collect()
            .await?;

        progress.on_phase_complete(GenerationPhase::Illustrations);
        Ok(images)
    }

    async fn draw(
        &self,
        prompt: &StoryPrompt,
        page: PageNumber,
        text: &PageText,
        reference: Option<&PageImage>,
    ) -> Result<PageImage, GatewayError> {
        let image_prompt =
            PromptTemplate::illustration(prompt.content(), page, text, reference.is_some());

        let image = self
            .gateway
            .generate_image(ImageRequest {
                model: &self.params.image_model,
                prompt: &image_prompt,
                reference,
            })
            .await?;

        debug!(
            page = page.get(),
            format = %image.format(),
            bytes = image.len(),
            "Page illustrated"
        );
        Ok(image)
    }
}
