//! Term-document matrix generator.
//!
//! Reads the vocabulary and the firms' pages from a Solr core, keeps the
//! words accepted by the length/alphabet rules and the Italian and English
//! whitelists, and writes a tab-separated matrix of stem frequencies with one
//! row per firm.

use std::path::Path;

use anyhow::Context;
use tracing::info;

pub mod config;
pub mod dictionary;
pub mod error;
pub mod generator;
pub mod logging;
pub mod matrix;
pub mod solr;
pub mod text;

pub use config::Config;
pub use error::{Result, TdmError};
pub use generator::{GenerationSummary, Generator};

use crate::dictionary::Dictionary;
use crate::solr::SolrClient;
use crate::text::{StemmerDispatcher, WordFilter};

// ============================================================================
// Entry points
// ============================================================================

/// Local time formatted for output and log file names.
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d_%H_%M_%S").to_string()
}

/// Load dictionaries, connect to Solr and write the matrix described by
/// `config`.
pub async fn generate(config: &Config) -> Result<GenerationSummary> {
    let italian = Dictionary::load(&config.italian_dictionary)?;
    let english = Dictionary::load(&config.english_dictionary)?;

    let client = SolrClient::new(&config.index)?;
    info!("Using Solr core at {}", config.index.base_url());

    Generator::new(
        client,
        WordFilter::new(config.word_length),
        StemmerDispatcher::new(italian, english),
    )
    .with_firm_concurrency(config.firm_concurrency)
    .skip_failed_firms(config.skip_failed_firms)
    .run(&config.output_dir)
    .await
}

/// Read the configuration at `config_path`, apply its log level, then
/// generate. Nothing is sent to Solr unless the configuration is valid.
pub async fn run(
    config_path: &Path,
    logging: Option<&logging::Logging>,
) -> anyhow::Result<GenerationSummary> {
    let config = Config::load(config_path).context("Invalid configuration")?;
    if let Some(logging) = logging {
        logging.set_level(config.log_level)?;
    }

    let summary = generate(&config).await?;
    Ok(summary)
}
