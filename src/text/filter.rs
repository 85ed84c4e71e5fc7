//! Acceptance rules for countable words.

use crate::config::WordLengthBounds;

const APOSTROPHES: [char; 2] = ['\'', '\u{2019}'];

/// Decides whether a raw token qualifies as a countable word.
#[derive(Debug, Clone, Copy)]
pub struct WordFilter {
    bounds: WordLengthBounds,
}

impl WordFilter {
    pub fn new(bounds: WordLengthBounds) -> Self {
        Self { bounds }
    }

    /// Rules, in order:
    ///
    /// 1. an elided prefix up to the first apostrophe is ignored (`l'uomo` is
    ///    judged as `uomo`); the judged word stops at a second apostrophe;
    /// 2. what remains must be non-empty and entirely alphabetic (Unicode);
    /// 3. its length in characters must lie within the configured bounds;
    /// 4. its first character must be an ASCII letter.
    ///
    /// Rule 4 rejects words such as `àlbero` even though rule 2 accepts them.
    pub fn is_acceptable(&self, token: &str) -> bool {
        let word = token.split(APOSTROPHES).nth(1).unwrap_or(token);

        if word.is_empty() || !word.chars().all(char::is_alphabetic) {
            return false;
        }

        let len = word.chars().count();
        if len < self.bounds.min || len > self.bounds.max {
            return false;
        }

        word.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> WordFilter {
        WordFilter::new(WordLengthBounds { min: 3, max: 12 })
    }

    #[test]
    fn accepts_plain_words_within_bounds() {
        let f = filter();
        assert!(f.is_acceptable("casa"));
        assert!(f.is_acceptable("House"));
        assert!(f.is_acceptable("città"));
        assert!(f.is_acceptable("abc"));
        assert!(f.is_acceptable("abcdefghijkl"));
    }

    #[test]
    fn rejects_non_ascii_first_letter() {
        assert!(!filter().is_acceptable("àlbero"));
        assert!(!filter().is_acceptable("éclair"));
    }

    #[test]
    fn rejects_out_of_bounds_lengths() {
        let f = filter();
        assert!(!f.is_acceptable("ab"));
        assert!(!f.is_acceptable("abcdefghijklm"));
        assert!(!f.is_acceptable(""));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // six characters, seven bytes
        let f = WordFilter::new(WordLengthBounds { min: 1, max: 6 });
        assert!(f.is_acceptable("perché"));
        assert!(!WordFilter::new(WordLengthBounds { min: 7, max: 9 }).is_acceptable("perché"));
    }

    #[test]
    fn rejects_non_alphabetic_tokens() {
        let f = filter();
        assert!(!f.is_acceptable("2023"));
        assert!(!f.is_acceptable("covid19"));
        assert!(!f.is_acceptable("e-mail"));
        assert!(!f.is_acceptable("bella,"));
    }

    #[test]
    fn elided_prefix_is_ignored() {
        let f = filter();
        assert!(f.is_acceptable("l'uomo"));
        assert!(f.is_acceptable("dell\u{2019}anno"));
        // "uo" alone is too short
        assert!(!f.is_acceptable("l'uo"));
        assert!(!f.is_acceptable("l'"));
        assert!(!f.is_acceptable("l'àlbero"));
    }

    #[test]
    fn judged_word_ends_at_second_apostrophe() {
        let f = filter();
        assert!(f.is_acceptable("quell'uomo'"));
        assert!(f.is_acceptable("a'bcd'ef"));
        assert!(f.is_acceptable("l\u{2019}anno'"));
        // "ab" sits between the apostrophes and is too short
        assert!(!f.is_acceptable("x'ab'cdef"));
        assert!(!f.is_acceptable("l''uomo"));
    }
}
