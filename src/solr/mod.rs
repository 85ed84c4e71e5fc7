//! Read-only client for the Solr core holding the firms' web pages.

pub mod client;
pub mod response;

pub use client::{IndexSource, SolrClient};
pub use response::FirmId;

/// Page title field.
pub const TITLE_FIELD: &str = "titolo";
/// Page body text field.
pub const BODY_FIELD: &str = "corpoPagina";
/// Field identifying the firm a page belongs to.
pub const FIRM_ID_FIELD: &str = "firmId";

/// Fields whose indexed terms make up the matrix columns.
pub const TEXT_FIELDS: [&str; 2] = [TITLE_FIELD, BODY_FIELD];

/// Lower bound for the terms enumeration; terms sorting before it are skipped.
pub const TERMS_LOWER_BOUND: &str = "a";
