//! The term-document matrix: fixed stem columns and one count row per firm.

pub mod row;
pub mod vocabulary;
pub mod writer;

pub use row::FirmRow;
pub use vocabulary::Vocabulary;
pub use writer::MatrixWriter;

/// Label of the first header cell.
pub const FIRM_ID_HEADER: &str = "firmId";
/// Cell separator.
pub const SEPARATOR: char = '\t';
