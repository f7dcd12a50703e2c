//! Output formatter trait

use crate::cli::commands::OutputFormat;
use crate::output::console::ConsoleFormatter;
use storybook_application::{SavedBook, StoredBook};

/// Trait for rendering books on stdout
pub trait OutputFormatter {
    /// Format a book that was just generated and saved
    fn format_saved(&self, saved: &SavedBook) -> serde_json::Result<String>;

    /// Format a book read back from disk
    fn format_stored(&self, stored: &StoredBook) -> serde_json::Result<String>;
}

/// Formatter for the requested output format
pub fn formatter_for(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(ConsoleFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Prints the manifest exactly as stored in `book_data.json`
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_saved(&self, saved: &SavedBook) -> serde_json::Result<String> {
        saved.manifest.to_json_pretty()
    }

    fn format_stored(&self, stored: &StoredBook) -> serde_json::Result<String> {
        stored.manifest.to_json_pretty()
    }
}
