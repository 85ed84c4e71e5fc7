//! Language disambiguation and Snowball stemming.

use std::fmt;

use rust_stemmers::{Algorithm, Stemmer};

use crate::dictionary::Dictionary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Italian,
    English,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Italian => f.write_str("italian"),
            Language::English => f.write_str("english"),
        }
    }
}

/// What to do with a word found in neither dictionary.
///
/// Column construction stems such words as English while per-firm counting
/// drops them, so a column may exist for a stem no firm row ever counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownWordPolicy {
    StemAsEnglish,
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stemmed {
    pub stem: String,
    pub language: Language,
}

/// Picks a language for each word by dictionary membership and stems it.
///
/// Italian wins when a word is in both dictionaries.
pub struct StemmerDispatcher {
    italian_words: Dictionary,
    english_words: Dictionary,
    italian: Stemmer,
    english: Stemmer,
}

impl StemmerDispatcher {
    pub fn new(italian_words: Dictionary, english_words: Dictionary) -> Self {
        Self {
            italian_words,
            english_words,
            italian: Stemmer::create(Algorithm::Italian),
            english: Stemmer::create(Algorithm::English),
        }
    }

    pub fn language_of(&self, word: &str, policy: UnknownWordPolicy) -> Option<Language> {
        if self.italian_words.contains(word) {
            Some(Language::Italian)
        } else if self.english_words.contains(word) {
            Some(Language::English)
        } else {
            match policy {
                UnknownWordPolicy::StemAsEnglish => Some(Language::English),
                UnknownWordPolicy::Skip => None,
            }
        }
    }

    /// Stem `word`, or return `None` when the policy drops it.
    pub fn stem(&self, word: &str, policy: UnknownWordPolicy) -> Option<Stemmed> {
        let language = self.language_of(word, policy)?;
        Some(Stemmed {
            stem: self.stem_as(word, language),
            language,
        })
    }

    /// Lowercase and stem with the given language's algorithm.
    pub fn stem_as(&self, word: &str, language: Language) -> String {
        let lower = word.to_lowercase();
        let stemmer = match language {
            Language::Italian => &self.italian,
            Language::English => &self.english,
        };
        stemmer.stem(&lower).into_owned()
    }
}
