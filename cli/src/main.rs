mod commands;
mod pager;

use std::fs;
use std::io::{self, Read};

use clap::{Parser, ValueEnum};
use client::config::{
    ClientConfig, ConfigError, DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS, Timeouts,
};
use client::state::results::DEFAULT_PAGE_LIMIT;
use client::state::{FormState, SentenceCount};
use client::{Summarizer, TransportKind};
use tokio::io::BufReader;

use crate::pager::{run_once, run_pager, submit_status};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to read input {path}: {source}")]
    ReadInput { path: String, source: io::Error },
    #[error("missing input; pass a file path, - for stdin, or --text")]
    MissingInput,
    #[error("terminal io failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TransportArg {
    /// Single request/response call.
    Http,
    /// Websocket session streaming partial results.
    Stream,
}

impl From<TransportArg> for TransportKind {
    fn from(value: TransportArg) -> Self {
        match value {
            TransportArg::Http => Self::Http,
            TransportArg::Stream => Self::Stream,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "summarize", about = "Split text into sentence groups and summarize each group")]
struct Cli {
    #[arg(long, env = "SUMMARIZE_API_URI", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    #[arg(long, env = "SUMMARIZE_SOCKET_URI", default_value = DEFAULT_BASE_URL)]
    socket_url: String,

    #[arg(long, env = "SUMMARIZE_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    request_timeout_secs: u64,

    #[arg(long, env = "SUMMARIZE_CONNECT_TIMEOUT_SECS", default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    connect_timeout_secs: u64,

    #[arg(long, value_enum, default_value_t = TransportArg::Http)]
    transport: TransportArg,

    #[arg(long, default_value = "4", allow_hyphen_values = true, help = "Sentences per group; empty or non-numeric means 0")]
    sentences: String,

    #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT, value_parser = parse_page_size)]
    page_size: usize,

    #[arg(long, conflicts_with = "input", help = "Text to summarize instead of an input file")]
    text: Option<String>,

    #[arg(long, default_value_t = false, help = "Print the first page when done and exit")]
    once: bool,

    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    #[arg(help = "Input file path, or - for stdin")]
    input: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ClientConfig::from_parts(
        Some(cli.socket_url.clone()),
        Some(cli.api_url.clone()),
        Timeouts {
            request_secs: cli.request_timeout_secs,
            connect_secs: cli.connect_timeout_secs,
        },
    )?;
    let (text, from_stdin) = read_text(&cli)?;
    let form = FormState::new(text, SentenceCount::from_input(&cli.sentences));

    let mut summarizer = Summarizer::new(config, cli.transport.into(), cli.page_size);
    if !summarizer.submit(&form) {
        eprintln!("nothing to summarize");
        return Ok(());
    }
    eprintln!("{}", submit_status(&summarizer));

    if cli.once || from_stdin {
        run_once(&mut summarizer).await;
    } else {
        run_pager(&mut summarizer, &form, BufReader::new(tokio::io::stdin())).await?;
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();
}

fn parse_page_size(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(size) if size >= 1 => Ok(size),
        _ => Err(format!("page size must be a positive integer, got `{raw}`")),
    }
}

/// Returns the text and whether it came from stdin.
fn read_text(cli: &Cli) -> Result<(String, bool), CliError> {
    if let Some(text) = &cli.text {
        return Ok((text.clone(), false));
    }
    match cli.input.as_deref() {
        None => Err(CliError::MissingInput),
        Some("-") => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|source| CliError::ReadInput {
                    path: "-".to_owned(),
                    source,
                })?;
            Ok((text, true))
        }
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| CliError::ReadInput {
                path: path.to_owned(),
                source,
            })?;
            Ok((text, false))
        }
    }
}
