//! Word tokenization, filtering and stemming.

pub mod filter;
pub mod stemmer;
pub mod tokenize;

pub use filter::WordFilter;
pub use stemmer::{Language, Stemmed, StemmerDispatcher, UnknownWordPolicy};
