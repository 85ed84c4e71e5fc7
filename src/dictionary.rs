//! Whitelist dictionaries used to decide a word's language.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::DictionaryError;

/// A read-only set of word forms for one language.
///
/// Lookups are exact and case-sensitive: entries are stored as they appear in
/// the file, only trimmed of surrounding whitespace.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: HashSet<String>,
}

impl Dictionary {
    /// Load a UTF-8 file with one word per line. Blank lines are skipped.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| DictionaryError {
            path: path.to_path_buf(),
            source,
        })?;
        let dictionary: Self = text.lines().collect();
        info!(
            "Loaded {} words from dictionary {}",
            dictionary.len(),
            path.display()
        );
        Ok(dictionary)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for Dictionary {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let words = iter
            .into_iter()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        Self { words }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn load_trims_lines_and_keeps_case() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ita.txt");
        let mut f = fs::File::create(&path).unwrap();
        write!(f, "casa\n  albero \r\nRoma\n\n").unwrap();

        let dict = Dictionary::load(&path).unwrap();
        assert_eq!(dict.len(), 3);
        assert!(dict.contains("casa"));
        assert!(dict.contains("albero"));
        assert!(dict.contains("Roma"));
        assert!(!dict.contains("roma"));
        assert!(!dict.contains(""));
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = Dictionary::load(dir.path().join("nope.txt")).unwrap_err();
        assert!(err.to_string().contains("nope.txt"));
    }
}
