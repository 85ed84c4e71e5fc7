//! `config.cfg` loading and validation.
//!
//! The file is a flat list of `KEY=value` lines. Comment lines start with `#`
//! and any line that does not split into exactly one key and one value is
//! skipped. Unknown keys are ignored.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;
use tracing_subscriber::filter::LevelFilter;

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "config.cfg";
/// Environment variable that overrides [`DEFAULT_CONFIG_FILE`].
pub const CONFIG_ENV_VAR: &str = "TDM_CONFIG";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Connection and paging settings for the Solr core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSettings {
    pub address: String,
    pub port: u16,
    pub core: String,
    /// `rows` for the match-all firm id query.
    pub max_docs: u64,
    /// `rows` for each per-firm document query.
    pub max_docs_per_firm: u64,
    /// Terms must occur strictly more often than this to become columns.
    pub min_occurrences: u64,
    pub timeout: Duration,
}

impl IndexSettings {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}/solr/{}/", self.address, self.port, self.core)
    }
}

/// Inclusive character-length window for accepted words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordLengthBounds {
    pub min: usize,
    pub max: usize,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub index: IndexSettings,
    pub word_length: WordLengthBounds,
    pub italian_dictionary: PathBuf,
    pub english_dictionary: PathBuf,
    pub log_level: LevelFilter,
    pub output_dir: PathBuf,
    pub firm_concurrency: usize,
    pub skip_failed_firms: bool,
}

impl Config {
    /// Path to read the configuration from: `$TDM_CONFIG`, else `config.cfg`.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Read configuration from {}", path.display());
        Self::from_settings(&parse_settings(&text))
    }

    /// Validate raw settings. Keys are checked in a fixed order and the first
    /// failure is returned.
    pub fn from_settings(settings: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let s = Settings(settings);

        let italian_dictionary = s.file("ITA_DICTIONARY_FILE")?;
        let english_dictionary = s.file("ENG_DICTIONARY_FILE")?;
        let address = s.required("SOLR_IP_ADDRESS")?.to_string();
        let port = s.integer::<u16>("SOLR_PORT_NUMBER")?;
        let core = s.required("SOLR_CORE_NAME")?.to_string();
        let max_docs = s.integer::<u64>("SOLR_MAX_DOCS")?;
        let min_occurrences = s.integer::<u64>("MIN_NUM_OF_OCCURRENCES")?;
        let max_docs_per_firm = s.integer::<u64>("MAX_NUM_DOCS_PER_FIRM")?;
        let min = s.integer::<usize>("MIN_WORD_LENGTH")?;
        let max = s.integer::<usize>("MAX_WORD_LENGTH")?;
        if min > max {
            return Err(ConfigError::WordLengthBounds { min, max });
        }

        let log_level = match s.optional("LOG_LEVEL") {
            Some(value) => parse_level(value)?,
            None => LevelFilter::INFO,
        };
        let output_dir = match s.optional("OUTPUT_DIR") {
            Some(value) => {
                let dir = PathBuf::from(value);
                if !dir.is_dir() {
                    return Err(ConfigError::InvalidDirectory {
                        key: "OUTPUT_DIR",
                        value: value.to_string(),
                    });
                }
                dir
            }
            None => PathBuf::from("."),
        };
        let timeout_secs = match s.optional("SOLR_TIMEOUT_SECONDS") {
            Some(_) => s.integer::<u64>("SOLR_TIMEOUT_SECONDS")?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        let firm_concurrency = match s.optional("FIRM_CONCURRENCY") {
            Some(value) => {
                let n = s.integer::<usize>("FIRM_CONCURRENCY")?;
                if n == 0 {
                    return Err(ConfigError::ZeroNotAllowed {
                        key: "FIRM_CONCURRENCY",
                        value: value.to_string(),
                    });
                }
                n
            }
            None => 1,
        };
        let skip_failed_firms = match s.optional("SKIP_FAILED_FIRMS") {
            Some(value) => parse_bool("SKIP_FAILED_FIRMS", value)?,
            None => false,
        };

        Ok(Self {
            index: IndexSettings {
                address,
                port,
                core,
                max_docs,
                max_docs_per_firm,
                min_occurrences,
                timeout: Duration::from_secs(timeout_secs),
            },
            word_length: WordLengthBounds { min, max },
            italian_dictionary,
            english_dictionary,
            log_level,
            output_dir,
            firm_concurrency,
            skip_failed_firms,
        })
    }
}

/// Split `KEY=value` lines into a map. Later duplicates win.
pub fn parse_settings(text: &str) -> HashMap<String, String> {
    let mut settings = HashMap::new();
    for line in text.lines() {
        if line.starts_with('#') {
            continue;
        }
        let mut parts = line.split('=');
        if let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) {
            settings.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    settings
}

struct Settings<'a>(&'a HashMap<String, String>);

impl<'a> Settings<'a> {
    fn optional(&self, key: &str) -> Option<&'a str> {
        self.0.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    fn required(&self, key: &'static str) -> Result<&'a str, ConfigError> {
        self.optional(key).ok_or(ConfigError::Missing(key))
    }

    fn integer<T: std::str::FromStr>(&self, key: &'static str) -> Result<T, ConfigError> {
        let value = self.required(key)?;
        value.parse().map_err(|_| ConfigError::InvalidInteger {
            key,
            value: value.to_string(),
        })
    }

    fn file(&self, key: &'static str) -> Result<PathBuf, ConfigError> {
        let value = self.required(key)?;
        let path = PathBuf::from(value);
        if !path.is_file() {
            return Err(ConfigError::InvalidFile {
                key,
                value: value.to_string(),
            });
        }
        Ok(path)
    }
}

fn parse_level(value: &str) -> Result<LevelFilter, ConfigError> {
    let level = match value.to_ascii_uppercase().as_str() {
        "TRACE" => LevelFilter::TRACE,
        "DEBUG" => LevelFilter::DEBUG,
        "INFO" => LevelFilter::INFO,
        "WARN" | "WARNING" => LevelFilter::WARN,
        "ERROR" | "CRITICAL" => LevelFilter::ERROR,
        "OFF" => LevelFilter::OFF,
        _ => return Err(ConfigError::LogLevel(value.to_string())),
    };
    Ok(level)
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: value.to_string(),
        }),
    }
}
