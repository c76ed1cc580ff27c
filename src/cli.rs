//! CLI parsing and orchestration. Parses args, resolves the source, fetches content, evaluates
//! the query, and prints the report. Maps errors to exit codes.

use crate::config::{Options, Verbosity};
use crate::document::{Document, DocumentError, NamespaceBinding};
use crate::fetch::{fetch_content, user_agent, Fetch, FetchError, HttpFetcher};
use crate::report::write_report;
use crate::source::{resolve_mode, Mode};
use clap::Parser;
use std::io::Write;
use thiserror::Error;

/// CLI error carrying exit code and message.
#[derive(Debug, Error)]
pub enum CliRunError {
    #[error("Error: {0}")]
    InvalidInput(String),

    #[error("Error: Specified {mode} had no content: {source_ref}")]
    EmptyContent { mode: Mode, source_ref: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl CliRunError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliRunError::InvalidInput(_) => 1,
            CliRunError::Fetch(_) | CliRunError::EmptyContent { .. } => 2,
            CliRunError::Document(_) | CliRunError::Output(_) => 3,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "xptest", version)]
#[command(about = "Quickly test XPath queries against an HTML/XML file or URL")]
#[command(override_usage = "xptest [OPTIONS] <SOURCE> <QUERY>")]
#[command(after_help = user_agent_help())]
pub struct Args {
    /// File path or URL to query.
    pub source: Option<String>,

    /// XPath expression to evaluate.
    pub query: Option<String>,

    /// Output more information.
    #[arg(short, long)]
    pub verbose: bool,

    /// Output even more information, including the raw content.
    #[arg(short = 'w', long)]
    pub extra_verbose: bool,

    /// Override autodetection, force SOURCE to be treated as a file.
    #[arg(short, long, conflicts_with = "url")]
    pub file: bool,

    /// Override autodetection, force SOURCE to be treated as a URL.
    #[arg(short, long)]
    pub url: bool,

    /// Parse as XML instead of HTML.
    #[arg(short, long)]
    pub xml: bool,

    /// User-Agent for URL requests: a shortcut name or a literal header value.
    #[arg(short = 'a', long, value_name = "AGENT")]
    pub user_agent: Option<String>,

    /// Bind a namespace prefix for the query, as prefix=uri. Repeatable.
    #[arg(short, long, value_name = "PREFIX=URI", value_parser = NamespaceBinding::parse)]
    pub namespace: Vec<NamespaceBinding>,
}

fn user_agent_help() -> String {
    let names: Vec<&str> = user_agent::shortcut_names().collect();
    format!(
        "User-Agent shortcuts (case-insensitive): {}. Any other value is sent as given.",
        names.join(", ")
    )
}

/// Configure the stderr logger from the requested verbosity. No environment variables are read.
pub fn init_logger(verbosity: Verbosity) {
    env_logger::Builder::new()
        .filter_level(verbosity.level_filter())
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .target(env_logger::Target::Stderr)
        .init();
}

/// Entry point for the CLI. Builds the HTTP fetcher and writes the report to stdout.
pub fn run(args: &Args) -> Result<(), CliRunError> {
    let (source, query) = require_positionals(args)?;
    let options = Options::from_args(args);
    let mut fetcher = HttpFetcher::builder()
        .user_agent(options.user_agent.clone())
        .build()?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with(source, query, &options, &mut fetcher, &mut out)
}

fn require_positionals(args: &Args) -> Result<(&str, &str), CliRunError> {
    let source = args.source.as_deref().ok_or_else(|| {
        CliRunError::InvalidInput("Please specify an input file or URL.".to_string())
    })?;
    let query = args
        .query
        .as_deref()
        .ok_or_else(|| CliRunError::InvalidInput("Please specify a query.".to_string()))?;
    Ok((source, query))
}

/// Resolve, fetch, evaluate, report. Nothing is written to `out` unless evaluation succeeds.
pub fn run_with<F: Fetch + ?Sized, W: Write>(
    source: &str,
    query: &str,
    options: &Options,
    fetcher: &mut F,
    out: &mut W,
) -> Result<(), CliRunError> {
    let mode = resolve_mode(source, options.forced_mode);
    log::info!("Opening {} ({}) for XPathing.", source, mode);

    let content = fetch_content(source, mode, fetcher)?
        .filter(|c| !c.is_empty())
        .ok_or_else(|| CliRunError::EmptyContent {
            mode,
            source_ref: source.to_string(),
        })?;

    log::info!(
        "Parsing {} bytes as {}.",
        content.body.len(),
        options.parser
    );
    let document = Document::parse_with_content_type(
        &content.body,
        options.parser,
        content.content_type.as_deref(),
    )?;
    let matches = document.evaluate(query, &options.namespaces)?;

    write_report(out, &matches, document.kind(), query)?;
    out.flush()?;
    Ok(())
}
