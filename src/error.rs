//! Error taxonomy for the generator.
//!
//! Every error is fatal for the run unless the caller opts into per-firm
//! isolation, in which case only [`IndexError`]s raised while fetching a
//! single firm's text are recovered from.

use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T, E = TdmError> = std::result::Result<T, E>;

/// Problems found while reading or validating the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No \"{}\" configuration file found", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Missing {0} parameter!")]
    Missing(&'static str),

    #[error("Invalid {key} parameter! {key} must be a non-negative integer (got {value:?})")]
    InvalidInteger { key: &'static str, value: String },

    #[error("Invalid {key} parameter! {key} must be true or false (got {value:?})")]
    InvalidBool { key: &'static str, value: String },

    #[error("Invalid {key} parameter! {value:?} is not an existing file")]
    InvalidFile { key: &'static str, value: String },

    #[error("Invalid {key} parameter! {value:?} is not an existing directory")]
    InvalidDirectory { key: &'static str, value: String },

    #[error("Invalid {key} parameter! {value:?} must be at least 1")]
    ZeroNotAllowed { key: &'static str, value: String },

    #[error("Invalid word length bounds: MIN_WORD_LENGTH ({min}) exceeds MAX_WORD_LENGTH ({max})")]
    WordLengthBounds { min: usize, max: usize },

    #[error("Invalid LOG_LEVEL parameter! Unknown level {0:?}")]
    LogLevel(String),
}

#[derive(Debug, Error)]
#[error("Failed to load dictionary {}: {source}", path.display())]
pub struct DictionaryError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Failures talking to the index service.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("HTTP request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: StatusCode },

    #[error("Malformed JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected response shape from {url}: {reason}")]
    Shape { url: String, reason: String },
}

#[derive(Debug, Error)]
pub enum TdmError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("Failed to write term-document matrix {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
