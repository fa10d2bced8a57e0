//! booktag - library export tagger
//!
//! Reads a Goodreads-style CSV export, asks a language model for tags for
//! every book and stores the tagged books in SQLite.

use anyhow::{Context, Result};
use booktag::config::{CliOverrides, Settings};
use booktag::workflow::{build_provider, extract_json, run_pipeline};
use booktag_common::config::{
    default_config_path, load_toml_config, resolve_path, CompiledDefaults, OrchestrationMode,
    ProviderKind, TomlConfig, ENV_INPUT_PATH,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for booktag
#[derive(Parser, Debug)]
#[command(name = "booktag")]
#[command(about = "Tag a library export with language-model generated tags")]
#[command(version)]
struct Cli {
    /// TOML config file (default: <config dir>/booktag/config.toml)
    #[arg(short, long, global = true, env = "BOOKTAG_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract, tag and store every book in the export
    Tag(TagArgs),
    /// Print the books extracted from the export as JSON
    Extract {
        /// Library export CSV
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct TagArgs {
    /// Library export CSV
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// SQLite database file
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Tagging provider: ollama or gemini
    #[arg(short, long)]
    provider: Option<ProviderKind>,

    /// Model name for the selected provider
    #[arg(short, long)]
    model: Option<String>,

    /// Orchestration mode: concurrent (failed books keep a sentinel tag)
    /// or sequential (failed books are dropped)
    #[arg(long)]
    mode: Option<OrchestrationMode>,

    /// Skip books that already have rows in the database
    #[arg(long)]
    skip_tagged: bool,
}

impl From<TagArgs> for CliOverrides {
    fn from(args: TagArgs) -> Self {
        Self {
            input_path: args.input,
            database_path: args.database,
            provider: args.provider,
            model: args.model,
            mode: args.mode,
            skip_tagged: args.skip_tagged,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let toml_config = match cli.config.clone().or_else(default_config_path) {
        Some(path) => load_toml_config(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => TomlConfig::default(),
    };

    init_tracing(&toml_config);

    info!("Starting booktag {}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Tag(args) => {
            let settings = Settings::resolve(&args.into(), &toml_config)?;

            let provider = build_provider(&settings)
                .with_context(|| format!("Failed to initialize {} provider", settings.provider))?;

            let summary = run_pipeline(&settings, provider).await?;

            info!(
                books_extracted = summary.books_extracted,
                books_submitted = summary.books_submitted,
                tag_entries = summary.tag_entries,
                rows_inserted = summary.rows_inserted,
                "Done"
            );
        }
        Command::Extract { input } => {
            let input_path = resolve_path(
                input.as_deref(),
                ENV_INPUT_PATH,
                toml_config.input_path.as_deref(),
                &CompiledDefaults::default().input_path,
            );

            println!("{}", extract_json(&input_path)?);
        }
    }

    Ok(())
}

/// Log to stderr; RUST_LOG wins over the configured level
fn init_tracing(toml_config: &TomlConfig) {
    let level = toml_config
        .logging
        .level
        .clone()
        .unwrap_or_else(|| CompiledDefaults::default().log_level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("booktag={level},booktag_common={level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
