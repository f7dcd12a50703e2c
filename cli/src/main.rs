//! CLI entrypoint for storybook
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use storybook_application::{
    BookRepository, GenerateBookInput, GenerateBookUseCase, GenerationProgress, NoProgress,
};
use storybook_domain::StoryPrompt;
use storybook_infrastructure::{
    ConfigLoader, FileConfig, FsBookRepository, OpenRouterGateway, OpenRouterSettings, Severity,
};
use storybook_presentation::{
    Cli, Command, GenerateArgs, OutputFormat, ProgressReporter, SimpleProgress, formatter_for,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    info!("Starting storybook");

    // .env may hold the API key
    ConfigLoader::load_dotenv();

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())?
    };

    match cli.command {
        Command::Generate(args) => {
            apply_overrides(&mut config, &args);
            check_config(&config)?;
            generate(&config, args, cli.quiet).await
        }
        Command::Read { dir, output } => {
            check_config(&config)?;
            read(&config, dir, output)
        }
        Command::Config => show_config(&config, cli.config.as_ref(), cli.no_config),
    }
}

/// Log level from `-v` count unless `RUST_LOG` is set
fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    // stderr keeps stdout clean for --output json
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// CLI flags take precedence over every config source
fn apply_overrides(config: &mut FileConfig, args: &GenerateArgs) {
    if let Some(model) = &args.text_model {
        config.models.text = Some(model.clone());
    }
    if let Some(model) = &args.image_model {
        config.models.image = Some(model.clone());
    }
    if let Some(dir) = &args.output_dir {
        config.output.dir = dir.clone();
    }
    if let Some(n) = args.concurrency {
        config.generation.illustration_concurrency = usize::from(n);
    }
}

/// Print warnings; fail on errors
fn check_config(config: &FileConfig) -> Result<()> {
    if !config.output.color {
        colored::control::set_override(false);
    }

    let issues = config.validate();
    let mut errors = 0;
    for issue in &issues {
        match issue.severity {
            Severity::Warning => warn!("{}", issue.message),
            Severity::Error => {
                errors += 1;
                eprintln!("{} {}", "config error:".red().bold(), issue.message);
            }
        }
    }
    if errors > 0 {
        bail!("{} configuration error(s)", errors);
    }
    Ok(())
}

async fn generate(config: &FileConfig, args: GenerateArgs, quiet: bool) -> Result<()> {
    let prompt = StoryPrompt::new(args.prompt).context("Please enter a story prompt")?;
    let params = config.to_generation_params();

    // === Dependency Injection ===
    let api_key = ConfigLoader::api_key(config)?;
    let settings = OpenRouterSettings::from_config(&config.provider, api_key);
    let gateway =
        Arc::new(OpenRouterGateway::new(settings).context("Failed to create HTTP client")?);
    let repository = Arc::new(FsBookRepository::new(config.output.dir.clone()));

    if !quiet {
        eprintln!();
        eprintln!("{} {}", "Story:".cyan().bold(), prompt);
        eprintln!(
            "{} {} / {}",
            "Models:".cyan().bold(),
            params.text_model,
            params.image_model
        );
        eprintln!();
    }

    let use_case = GenerateBookUseCase::new(gateway, repository, params);
    let input = GenerateBookInput::new(prompt);

    // Bars need a terminal; plain lines otherwise
    let reporter;
    let progress: &dyn GenerationProgress = if quiet {
        &NoProgress
    } else if std::io::stderr().is_terminal() {
        reporter = ProgressReporter::new();
        &reporter
    } else {
        &SimpleProgress
    };
    let output = use_case
        .execute_with_progress(input, progress)
        .await
        .context("Book generation failed")?;

    println!("{}", formatter_for(args.output).format_saved(&output.saved)?);
    Ok(())
}

fn read(config: &FileConfig, dir: Option<PathBuf>, output: OutputFormat) -> Result<()> {
    let repository = FsBookRepository::new(config.output.dir.clone());

    let dir = match dir {
        Some(dir) => dir,
        None => match repository.latest()? {
            Some(latest) => {
                eprintln!("{} {}", "Most recent book:".cyan(), latest.display());
                latest
            }
            None => bail!("No books found in {}", repository.root().display()),
        },
    };

    let stored = repository
        .load(&dir)
        .with_context(|| format!("Could not read book at {}", dir.display()))?;
    println!("{}", formatter_for(output).format_stored(&stored)?);
    Ok(())
}

fn show_config(config: &FileConfig, explicit: Option<&PathBuf>, no_config: bool) -> Result<()> {
    if no_config {
        println!("Configuration files disabled (--no-config); showing defaults.");
    } else {
        ConfigLoader::print_config_sources(explicit);
    }
    println!();

    let mut shown = config.clone();
    if shown.provider.api_key.is_some() {
        shown.provider.api_key = Some("<redacted>".to_string());
    }
    println!("{}", toml::to_string_pretty(&shown)?);

    match config.provider.resolve_api_key() {
        Some(_) => println!("API key: {}", "found".green()),
        None => println!(
            "API key: {} (set {})",
            "missing".red(),
            config.provider.api_key_env
        ),
    }

    for issue in config.validate() {
        println!("{}", issue);
    }
    Ok(())
}
