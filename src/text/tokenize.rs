use unicode_segmentation::UnicodeSegmentation;

/// Split natural-language text into word tokens on Unicode word boundaries.
///
/// Punctuation and whitespace are dropped; elided forms such as `l'uomo` and
/// numbers stay single tokens.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.unicode_words()
}
