//! Book aggregate

use super::PAGE_COUNT;
use super::page::{PageImage, PageNumber, PageText};
use crate::core::error::DomainError;
use crate::core::prompt::StoryPrompt;
use chrono::{DateTime, Utc};

/// One illustrated page (Entity, identified by its number)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub number: PageNumber,
    pub text: PageText,
    pub image: PageImage,
}

/// The complete result of one generation run (Aggregate Root)
///
/// Always holds exactly [`PAGE_COUNT`] pages numbered 1..=10 in order.
/// There are no mutators: a book is fully materialized before it is
/// persisted and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    prompt: StoryPrompt,
    generated_at: DateTime<Utc>,
    pages: Vec<Page>,
}

impl Book {
    /// Build a book from already-numbered pages, checking the page invariants
    pub fn new(
        prompt: StoryPrompt,
        generated_at: DateTime<Utc>,
        pages: Vec<Page>,
    ) -> Result<Self, DomainError> {
        if pages.len() != PAGE_COUNT {
            return Err(DomainError::WrongPageCount {
                expected: PAGE_COUNT,
                actual: pages.len(),
            });
        }
        for (expected, page) in PageNumber::all().zip(&pages) {
            if page.number != expected {
                return Err(DomainError::PageOutOfOrder {
                    expected: expected.get(),
                    found: page.number.get(),
                });
            }
            if page.image.is_empty() {
                return Err(DomainError::EmptyImage(page.number.get()));
            }
        }
        Ok(Self {
            prompt,
            generated_at,
            pages,
        })
    }

    /// Pair ordered texts with ordered images, numbering them 1..=10
    pub fn assemble(
        prompt: StoryPrompt,
        generated_at: DateTime<Utc>,
        texts: Vec<PageText>,
        images: Vec<PageImage>,
    ) -> Result<Self, DomainError> {
        for count in [texts.len(), images.len()] {
            if count != PAGE_COUNT {
                return Err(DomainError::WrongPageCount {
                    expected: PAGE_COUNT,
                    actual: count,
                });
            }
        }
        let pages = PageNumber::all()
            .zip(texts.into_iter().zip(images))
            .map(|(number, (text, image))| Page {
                number,
                text,
                image,
            })
            .collect();
        Self::new(prompt, generated_at, pages)
    }

    pub fn prompt(&self) -> &StoryPrompt {
        &self.prompt
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, number: PageNumber) -> &Page {
        &self.pages[number.get() - 1]
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::book::page::ImageFormat;

    pub fn texts(n: usize) -> Vec<PageText> {
        (1..=n)
            .map(|i| PageText::new(i, format!("Page {} text.", i)).unwrap())
            .collect()
    }

    pub fn images(n: usize) -> Vec<PageImage> {
        (1..=n)
            .map(|i| PageImage::new(vec![i as u8; 4], ImageFormat::Png))
            .collect()
    }

    pub fn book() -> Book {
        Book::assemble(
            StoryPrompt::new("a sleepy owl").unwrap(),
            "2025-10-05T14:30:22Z".parse().unwrap(),
            texts(PAGE_COUNT),
            images(PAGE_COUNT),
        )
        .unwrap()
    }
}
