//! Prompt templates for the storybook flow

use crate::book::PAGE_COUNT;
use crate::book::page::{PageNumber, PageText};

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for the story script
    pub fn story_system() -> String {
        format!(
            r#"You are a children's book author. Generate a {count}-page children's story script.
Each page should have exactly 1-2 sentences that are engaging, age-appropriate, and tell a cohesive story.
Format your response as exactly {count} pages, numbered 1-{count}, with each page on its own line starting with "Page X: " followed by the text."#,
            count = PAGE_COUNT
        )
    }

    /// User prompt for the story script
    pub fn story_request(prompt: &str) -> String {
        format!(
            "Write a {}-page children's story about: {}",
            PAGE_COUNT, prompt
        )
    }

    /// Caption placed before the reference image in an illustration request
    pub fn reference_caption() -> &'static str {
        "Reference image for style:"
    }

    /// Prompt for one page's illustration
    ///
    /// With `styled_after_reference` the model is told to copy the art style of
    /// the reference image sent alongside the prompt.
    pub fn illustration(
        story_prompt: &str,
        page: PageNumber,
        text: &PageText,
        styled_after_reference: bool,
    ) -> String {
        if styled_after_reference {
            format!(
                r#"Children's book illustration. Use the same art style, color palette, and visual aesthetic as the reference image provided.
Scene from a story about {story}.
This is page {page} of the book.
Page content: {text}

IMPORTANT: Match the artistic style, character design, colors, and overall look of the reference image exactly."#,
                story = story_prompt,
                page = page,
                text = text
            )
        } else {
            format!(
                r#"Children's book illustration style, colorful and friendly.
Scene from a story about {story}.
This is page {page} of the book.
Page content: {text}"#,
                story = story_prompt,
                page = page,
                text = text
            )
        }
    }
}
