use std::collections::BTreeSet;

use tracing::trace;

use crate::text::{StemmerDispatcher, UnknownWordPolicy, WordFilter};

/// Sorted, deduplicated stems forming the matrix columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    columns: Vec<String>,
}

impl Vocabulary {
    /// Filter and stem every index term. Words missing from both
    /// dictionaries are stemmed as English here.
    pub fn build<'a, I>(terms: I, filter: &WordFilter, stemmers: &StemmerDispatcher) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let stems: BTreeSet<String> = terms
            .into_iter()
            .filter(|term| filter.is_acceptable(term))
            .filter_map(|term| {
                let stemmed = stemmers.stem(term, UnknownWordPolicy::StemAsEnglish)?;
                trace!("{} -> {} ({})", term, stemmed.stem, stemmed.language);
                Some(stemmed.stem)
            })
            .collect();

        Self {
            columns: stems.into_iter().collect(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
