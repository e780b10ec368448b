//! Fatal error types: anything here stops the client before or instead of reconnecting.

use std::path::PathBuf;
use thiserror::Error;

/// Bad local setup. Reported before any connection attempt; the CLI exits with status 1.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read key file {path}: {source}")]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("key file {path} is incomplete: expected 4 non-empty lines, found {found}")]
    ShortKeyFile { path: PathBuf, found: usize },

    #[error("cannot open output file {path}: {source}")]
    OutputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid endpoint URL {url:?}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("none of the {supplied} supplied track keywords are usable")]
    NoUsableKeywords { supplied: usize },

    #[error("config file: {0}")]
    ConfigFile(String),
}

/// A request could not be signed. Retrying with the same inputs cannot help.
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("credential {0} is empty")]
    MissingCredential(&'static str),

    #[error("cannot sign URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}
