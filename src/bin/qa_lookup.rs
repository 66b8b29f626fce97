// src/bin/qa_lookup.rs
//! Headless lookup against the knowledge base
//!
//! Loads the same knowledge base the tooltip uses and either answers a single
//! query or dumps every record. Handy for checking a new answer file before
//! pointing the tooltip at it.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use selection_tooltip::config::{TooltipConfig, DEFAULT_SOURCE_URL};
use selection_tooltip::{find_answer, KnowledgeSource, KnowledgeStore};

#[derive(Debug, Parser)]
#[command(
    name = "qa-lookup",
    version,
    about = "Look up answers in a selection-tooltip knowledge base"
)]
struct Args {
    /// Text to look up, as if it had been selected
    #[arg(required_unless_present = "dump")]
    query: Option<String>,

    /// Print every record instead of answering a query
    #[arg(long, conflicts_with = "query")]
    dump: bool,

    /// Knowledge base location: an http(s) URL or a local file path
    #[arg(long, default_value = DEFAULT_SOURCE_URL)]
    source: KnowledgeSource,

    /// Output format
    #[arg(long, default_value = "human", value_enum)]
    format: OutputFormat,

    /// Verbosity level for logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, clap::ValueEnum)]
enum OutputFormat {
    /// Plain text
    Human,
    /// JSON for scripts
    Json,
}

fn setup_logging(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn render_answer(format: &OutputFormat, query: &str, answer: Option<&str>) -> Result<String> {
    Ok(match format {
        OutputFormat::Human => answer.unwrap_or("No answer found").to_string(),
        OutputFormat::Json => serde_json::to_string(&serde_json::json!({
            "query": query,
            "answer": answer,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }))?,
    })
}

fn render_dump(format: &OutputFormat, store: &KnowledgeStore) -> Result<String> {
    Ok(match format {
        OutputFormat::Human => store.to_block_text(),
        OutputFormat::Json => serde_json::to_string_pretty(store.records())?,
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let config = TooltipConfig {
        source: args.source.clone(),
        ..TooltipConfig::default()
    };
    let store = KnowledgeStore::load(&config.source, config.fetch_timeout)
        .await
        .with_context(|| format!("Error loading answers from {}", config.source))?;
    debug!("{} records loaded", store.len());

    if args.dump {
        print!("{}", render_dump(&args.format, &store)?);
        return Ok(ExitCode::SUCCESS);
    }

    let query = args.query.as_deref().unwrap_or_default().trim();
    let answer = find_answer(&store, query);
    println!("{}", render_answer(&args.format, query, answer.as_deref())?);

    Ok(if answer.is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
