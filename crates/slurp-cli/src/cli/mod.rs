//! CLI for the slurp stream capture client.

use anyhow::{Context, Result};
use clap::Parser;
use slurp_core::config::{self, SlurpConfig};
use slurp_core::credentials::Credentials;
use slurp_core::error::ConfigError;
use slurp_core::keywords::KeywordList;
use slurp_core::logging;
use slurp_core::request::{OAuth1Signer, StreamRequest};
use slurp_core::retry::Backoff;
use slurp_core::sink::OutputSink;
use slurp_core::supervisor::{Supervisor, Termination};
use slurp_core::transport::{CurlOptions, CurlTransport};
use std::path::PathBuf;

/// Exit status for configuration failures (bad arguments, key file, output file).
pub const EXIT_CONFIG: i32 = 1;

/// Capture a signed HTTP streaming feed to a file or stdout, reconnecting on failure.
#[derive(Debug, Parser)]
#[command(name = "slurp", version)]
#[command(about = "Capture a signed streaming feed, reconnecting with backoff", long_about = None)]
pub struct Cli {
    /// Key file: consumer key, consumer secret, access token, access token secret, one per line.
    pub keyfile: PathBuf,

    /// Output file for raw stream bytes (default: stdout).
    pub outfile: Option<PathBuf>,

    /// Track a keyword on the filtered feed instead of reading the sample feed.
    /// Repeatable; at most 16 keywords of up to 60 characters are kept.
    #[arg(short = 't', long = "track", value_name = "KEYWORD")]
    pub track: Vec<String>,

    /// Append to OUTFILE instead of truncating it.
    #[arg(long)]
    pub append: bool,

    /// Read configuration from this file instead of ~/.config/slurp/config.toml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write diagnostics to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Parse arguments, stream until a terminal condition, and return the process exit code.
pub fn run_from_args() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // --help and --version are not failures.
            return if err.use_stderr() { EXIT_CONFIG } else { 0 };
        }
    };

    match &cli.log_file {
        Some(path) => {
            if let Err(err) = logging::init_logging_file(path) {
                logging::init_logging_stderr();
                tracing::warn!("log file unavailable ({:#}), logging to stderr", err);
            }
        }
        None => logging::init_logging_stderr(),
    }

    match run(&cli) {
        Ok(termination) => termination.exit_code(),
        Err(err) => {
            eprintln!("{}", failure_message(&err));
            EXIT_CONFIG
        }
    }
}

/// One-line report for a setup failure, with the full context chain.
fn failure_message(err: &anyhow::Error) -> String {
    format!("slurp error: {:#}", err)
}

fn load_config(cli: &Cli) -> Result<SlurpConfig, ConfigError> {
    match &cli.config {
        Some(path) => config::load_from(path),
        None => config::load_or_init(),
    }
}

/// Build the stream request from arguments; everything here fails before any connection.
fn build_request(cli: &Cli, cfg: &SlurpConfig) -> Result<StreamRequest> {
    let credentials = Credentials::read_key_file(&cli.keyfile)?;
    let keywords = KeywordList::from_args(cli.track.iter().cloned());
    if keywords.is_empty() && !cli.track.is_empty() {
        return Err(ConfigError::NoUsableKeywords {
            supplied: cli.track.len(),
        }
        .into());
    }
    Ok(StreamRequest::new(&cfg.endpoints, keywords, credentials)?)
}

fn run(cli: &Cli) -> Result<Termination> {
    let cfg = load_config(cli).context("loading configuration")?;
    tracing::debug!("loaded config: {:?}", cfg);

    let request = build_request(cli, &cfg)?;
    let mut sink = OutputSink::open(cli.outfile.as_deref(), cli.append)?;
    tracing::info!(
        "streaming {} {} ({} keyword(s)) to {}",
        request.method(),
        request.endpoint(),
        request.keywords().len(),
        sink.describe()
    );

    let transport = CurlTransport::new(CurlOptions::from_config(&cfg));
    let mut supervisor = Supervisor::new(
        transport,
        OAuth1Signer::new(),
        Backoff::new(cfg.backoff()),
        cfg.idle_timeout(),
    );
    Ok(supervisor.run(&request, &mut sink))
}
