use std::collections::{BTreeMap, BTreeSet};

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::IndexSettings;
use crate::error::IndexError;
use crate::solr::response::{self, SelectResponse, TermsResponse};
use crate::solr::{FirmId, BODY_FIELD, FIRM_ID_FIELD, TITLE_FIELD};

const USER_AGENT: &str = concat!("tdm_generator/", env!("CARGO_PKG_VERSION"));

/// The three read-only queries the generator needs from the index.
#[allow(async_fn_in_trait)]
pub trait IndexSource {
    /// Index-time terms of `field` from `lower_bound` onwards, occurring more
    /// often than the configured minimum, with their counts.
    async fn distinct_terms(
        &self,
        field: &str,
        lower_bound: &str,
    ) -> Result<BTreeMap<String, u64>, IndexError>;

    /// Distinct firm identifiers found among the first `max_docs` documents.
    async fn firm_identifiers(&self) -> Result<BTreeSet<FirmId>, IndexError>;

    /// Titles and bodies of the firm's documents, space-joined.
    async fn firm_text(&self, firm: &FirmId) -> Result<String, IndexError>;
}

pub struct SolrClient {
    client: reqwest::Client,
    base_url: String,
    settings: IndexSettings,
}

impl SolrClient {
    pub fn new(settings: &IndexSettings) -> Result<Self, IndexError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout)
            .build()
            .map_err(IndexError::Client)?;

        Ok(Self {
            client,
            base_url: settings.base_url(),
            settings: settings.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        handler: &str,
        query: &[(&str, String)],
    ) -> Result<T, IndexError> {
        let url = format!("{}{}", self.base_url, handler);
        debug!("Querying {} with {:?}", url, query);

        let resp = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| IndexError::Request {
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(IndexError::Status {
                url: resp.url().to_string(),
                status,
            });
        }

        resp.json().await.map_err(|source| IndexError::Decode { url, source })
    }

    async fn select(&self, fields: &[&str], q: String, rows: u64) -> Result<SelectResponse, IndexError> {
        self.get_json(
            "select",
            &[
                ("fl", fields.join(",")),
                ("q", q),
                ("rows", rows.to_string()),
                ("wt", "json".to_string()),
            ],
        )
        .await
    }

    fn shape_error(&self, handler: &str, reason: String) -> IndexError {
        IndexError::Shape {
            url: format!("{}{}", self.base_url, handler),
            reason,
        }
    }
}

impl IndexSource for SolrClient {
    async fn distinct_terms(
        &self,
        field: &str,
        lower_bound: &str,
    ) -> Result<BTreeMap<String, u64>, IndexError> {
        let resp: TermsResponse = self
            .get_json(
                "terms",
                &[
                    ("terms.fl", field.to_string()),
                    ("terms.lower", lower_bound.to_string()),
                    ("terms.sort", "index".to_string()),
                    ("terms.limit", "-1".to_string()),
                    ("wt", "json".to_string()),
                ],
            )
            .await?;

        let pairs = resp
            .term_counts(field)
            .map_err(|reason| self.shape_error("terms", reason))?;
        let total = pairs.len();
        let terms: BTreeMap<String, u64> = pairs
            .into_iter()
            .filter(|(_, count)| *count > self.settings.min_occurrences)
            .collect();

        info!(
            "Field {}: {} indexed terms, {} occurring more than {} times",
            field,
            total,
            terms.len(),
            self.settings.min_occurrences
        );
        Ok(terms)
    }

    async fn firm_identifiers(&self) -> Result<BTreeSet<FirmId>, IndexError> {
        let resp = self
            .select(&[FIRM_ID_FIELD], "*:*".to_string(), self.settings.max_docs)
            .await?;

        let mut ids = BTreeSet::new();
        for doc in &resp.response.docs {
            let id = response::firm_id(doc, FIRM_ID_FIELD).ok_or_else(|| {
                self.shape_error("select", format!("document without a usable {FIRM_ID_FIELD}"))
            })?;
            ids.insert(id);
        }

        info!(
            "{} distinct firms among {} documents ({} matching)",
            ids.len(),
            resp.response.docs.len(),
            resp.response.num_found
        );
        Ok(ids)
    }

    async fn firm_text(&self, firm: &FirmId) -> Result<String, IndexError> {
        let resp = self
            .select(
                &[TITLE_FIELD, BODY_FIELD],
                firm_query(firm),
                self.settings.max_docs_per_firm,
            )
            .await?;

        let docs = &resp.response.docs;
        info!("docs found = {}", docs.len());

        let mut parts = Vec::with_capacity(docs.len() * 2);
        for doc in docs {
            for field in [TITLE_FIELD, BODY_FIELD] {
                match response::text(doc, field) {
                    Some(text) => parts.push(text),
                    None => {
                        warn!("Document of firm {} has no {} text", firm, field);
                        parts.push(String::new());
                    }
                }
            }
        }
        Ok(parts.join(" "))
    }
}

/// Exact-match query on the firm id field.
fn firm_query(firm: &FirmId) -> String {
    let escaped = firm.as_str().replace('\\', "\\\\").replace('"', "\\\"");
    format!("{}:\"{}\"", FIRM_ID_FIELD, escaped)
}
