use std::collections::HashMap;

use crate::matrix::Vocabulary;
use crate::solr::FirmId;
use crate::text::{tokenize, StemmerDispatcher, UnknownWordPolicy, WordFilter};

/// Stem frequencies for one firm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmRow {
    pub firm: FirmId,
    counts: HashMap<String, u64>,
}

impl FirmRow {
    /// Count the stems of every accepted token of `text`. Tokens found in
    /// neither dictionary are not counted.
    pub fn from_text(
        firm: FirmId,
        text: &str,
        filter: &WordFilter,
        stemmers: &StemmerDispatcher,
    ) -> Self {
        let mut counts = HashMap::new();
        for token in tokenize::words(text).filter(|t| filter.is_acceptable(t)) {
            if let Some(stemmed) = stemmers.stem(token, UnknownWordPolicy::Skip) {
                *counts.entry(stemmed.stem).or_insert(0) += 1;
            }
        }
        Self { firm, counts }
    }

    pub fn count(&self, stem: &str) -> u64 {
        self.counts.get(stem).copied().unwrap_or(0)
    }

    /// Counts aligned to the vocabulary's columns. Stems outside the
    /// vocabulary are dropped.
    pub fn cells(&self, vocabulary: &Vocabulary) -> Vec<u64> {
        vocabulary.columns().iter().map(|c| self.count(c)).collect()
    }

    /// Number of distinct stems counted, inside or outside the vocabulary.
    pub fn distinct_stems(&self) -> usize {
        self.counts.len()
    }
}
