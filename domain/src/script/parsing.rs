//! Story script parsing.
//!
//! Pure text processing: no I/O and no recovery. A reply that does not
//! contain exactly ten correctly numbered pages is an error; the caller never
//! gets a truncated or padded script.
//!
//! Accepted page lines (markdown emphasis and headings are tolerated):
//!
//! ```text
//! Page 1: Milo the mouse looked up at the moon.
//! **Page 2:** He was sure it was made of cheese.
//! ## Page 3: So he built a ladder.
//! ```

use crate::book::PAGE_COUNT;
use crate::book::page::PageText;
use crate::core::string::preview;
use thiserror::Error;

/// Why a model reply could not be turned into a script
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptParseError {
    #[error("No `Page N:` lines found in reply: {0}")]
    NoPages(String),

    #[error("Expected {expected} pages, found {actual}")]
    WrongPageCount { expected: usize, actual: usize },

    #[error("Pages out of order: expected page {expected}, found page {found}")]
    OutOfOrder { expected: usize, found: usize },

    #[error("Page {0} has no text")]
    EmptyPage(usize),
}

fn is_markup(c: char) -> bool {
    matches!(c, '*' | '_' | '#' | '>') || c.is_whitespace()
}

/// Parse one line as `Page N: text`, returning `(N, text)`
fn parse_page_line(line: &str) -> Option<(usize, &str)> {
    let cleaned = line.trim_start_matches(is_markup);
    if !cleaned.get(..4)?.eq_ignore_ascii_case("page") {
        return None;
    }
    let rest = cleaned[4..].trim_start();
    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let number = rest[..digits].parse().ok()?;
    let (_, text) = rest[digits..]
        .trim_start_matches(is_markup)
        .split_once(':')
        .filter(|(before, _)| before.is_empty())?;
    Some((number, text.trim_matches(is_markup)))
}

/// Parse a model reply into exactly [`PAGE_COUNT`] page texts.
///
/// # Examples
///
/// ```
/// use storybook_domain::script::parse_story_script;
///
/// let reply: String = (1..=10).map(|n| format!("Page {n}: Line {n}.\n")).collect();
/// let pages = parse_story_script(&reply).unwrap();
/// assert_eq!(pages.len(), 10);
/// assert_eq!(pages[0].as_str(), "Line 1.");
///
/// let short: String = (1..=9).map(|n| format!("Page {n}: Line {n}.\n")).collect();
/// assert!(parse_story_script(&short).is_err());
/// ```
pub fn parse_story_script(reply: &str) -> Result<Vec<PageText>, ScriptParseError> {
    let segments: Vec<(usize, &str)> = reply.lines().filter_map(parse_page_line).collect();

    if segments.is_empty() {
        return Err(ScriptParseError::NoPages(preview(reply, 80)));
    }
    if segments.len() != PAGE_COUNT {
        return Err(ScriptParseError::WrongPageCount {
            expected: PAGE_COUNT,
            actual: segments.len(),
        });
    }

    segments
        .into_iter()
        .enumerate()
        .map(|(i, (number, text))| {
            let expected = i + 1;
            if number != expected {
                return Err(ScriptParseError::OutOfOrder {
                    expected,
                    found: number,
                });
            }
            PageText::new(number, text).map_err(|_| ScriptParseError::EmptyPage(number))
        })
        .collect()
}
