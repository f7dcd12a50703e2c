//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for books
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Page-by-page listing
    Text,
    /// The `book_data.json` manifest
    Json,
}

/// CLI arguments for storybook
#[derive(Parser, Debug)]
#[command(name = "storybook")]
#[command(author, version, about = "Generate illustrated ten-page children's books")]
#[command(long_about = r#"
Storybook turns a one-line idea into an illustrated ten-page children's book.

The process has three steps:
1. Script: a text model writes ten short pages
2. Reference: page 1 is illustrated on its own and sets the art style
3. Pages 2-10: each is illustrated with page 1 as the style reference

The book is saved as generated_books/book_<timestamp>/ with page_01.png to
page_10.png and a book_data.json manifest.

Configuration files are loaded from (in priority order):
1. STORYBOOK_* env    e.g. STORYBOOK_MODELS__IMAGE
2. --config <path>    Explicit config file
3. ./storybook.toml   Project-level config
4. ~/.config/storybook/config.toml   Global config

The API key is read from OPENROUTER_API_KEY (a .env file works too).

Example:
  storybook generate "a shy dragon who learns to share"
  storybook generate --concurrency 3 "two snails race to the pond"
  storybook read
  storybook read generated_books/book_20251005_143022
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write, illustrate and save a new book
    Generate(GenerateArgs),

    /// Show a saved book (the most recent one if no directory is given)
    Read {
        /// Book directory, e.g. generated_books/book_20251005_143022
        dir: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show configuration sources and resolved values
    Config,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// What the story should be about
    pub prompt: String,

    /// Model that writes the script
    #[arg(long, value_name = "MODEL")]
    pub text_model: Option<String>,

    /// Model that draws the illustrations
    #[arg(long, value_name = "MODEL")]
    pub image_model: Option<String>,

    /// Directory that receives the book folder
    #[arg(short = 'd', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// How many of pages 2-10 to illustrate at once
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..=9))]
    pub concurrency: Option<u16>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}
