//! Console output formatter for books

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use storybook_application::{SavedBook, StoredBook, StoredPage};
use storybook_domain::BookManifest;

const WIDTH: usize = 72;

/// Formats books for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Summary of a freshly generated book
    pub fn format_saved(saved: &SavedBook) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Your Storybook"));
        output.push('\n');
        output.push_str(&Self::summary(&saved.manifest));

        for page in &saved.manifest.pages {
            output.push_str(&format!(
                "\n{} {}\n",
                format!("Page {:>2}", page.page_number).yellow().bold(),
                page.text
            ));
        }

        output.push_str(&format!(
            "\n{} {}\n",
            "Saved to:".green().bold(),
            saved.dir.display()
        ));
        output.push_str(&Self::footer());

        output
    }

    /// Page-by-page listing of a stored book, with image checks
    pub fn format_stored(stored: &StoredBook) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Children's Book"));
        output.push('\n');
        output.push_str(&Self::summary(&stored.manifest));
        output.push_str(&format!(
            "{} {}\n",
            "Folder:".cyan().bold(),
            stored.dir.display()
        ));

        for page in &stored.pages {
            output.push_str(&Self::stored_page(page));
        }

        let missing = stored.missing_images().count();
        output.push('\n');
        if missing == 0 {
            output.push_str(&format!("{}\n", "Book data loaded successfully.".green()));
        } else {
            output.push_str(&format!(
                "{}\n",
                format!("Book data loaded; {} image file(s) missing.", missing).yellow()
            ));
        }
        output.push_str(&Self::footer());

        output
    }

    fn summary(manifest: &BookManifest) -> String {
        format!(
            "{} {}\n{} {}\n{} {}\n",
            "Prompt:".cyan().bold(),
            manifest.prompt,
            "Generated:".cyan().bold(),
            manifest.generated_at,
            "Pages:".cyan().bold(),
            manifest.pages.len()
        )
    }

    fn stored_page(page: &StoredPage) -> String {
        let entry = &page.entry;
        let image = match page.dimensions {
            Some(d) => format!("{} ({}x{} pixels)", entry.image_file, d.width, d.height),
            None => format!("{} {}", entry.image_file, "(warning: image file not found)".yellow()),
        };
        format!(
            "{}{}\n{}\n{} {}\n",
            Self::section_header(&format!("Page {}", entry.page_number)),
            "-".repeat(WIDTH),
            Self::indent(&entry.text, "  "),
            "Image:".dimmed(),
            image
        )
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(WIDTH);
        format!(
            "{}\n{:^width$}\n{}",
            line.cyan(),
            title.bold(),
            line.cyan(),
            width = WIDTH
        )
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n", title.yellow().bold())
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(WIDTH).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_saved(&self, saved: &SavedBook) -> serde_json::Result<String> {
        Ok(Self::format_saved(saved))
    }

    fn format_stored(&self, stored: &StoredBook) -> serde_json::Result<String> {
        Ok(Self::format_stored(stored))
    }
}
