//! Two-phase matrix generation: fixed columns first, then one row per firm.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};
use tracing::{debug, error, info};

use crate::error::Result;
use crate::matrix::{FirmRow, MatrixWriter, Vocabulary};
use crate::solr::{FirmId, IndexSource, TERMS_LOWER_BOUND, TEXT_FIELDS};
use crate::text::{StemmerDispatcher, WordFilter};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RowStats {
    pub firms_found: usize,
    pub rows_written: usize,
    pub firms_skipped: usize,
}

#[derive(Debug, Clone)]
pub struct GenerationSummary {
    pub columns: usize,
    pub rows: RowStats,
    pub output: PathBuf,
}

impl GenerationSummary {
    pub fn print_stats(&self) {
        info!("=== TDM Statistics ===");
        info!("Columns (stems): {}", self.columns);
        info!("Firms found: {}", self.rows.firms_found);
        info!("Rows written: {}", self.rows.rows_written);
        info!("Firms skipped: {}", self.rows.firms_skipped);
        info!("Output file: {}", self.output.display());
    }
}

pub struct Generator<S> {
    source: S,
    filter: WordFilter,
    stemmers: StemmerDispatcher,
    firm_concurrency: usize,
    skip_failed_firms: bool,
}

impl<S: IndexSource> Generator<S> {
    pub fn new(source: S, filter: WordFilter, stemmers: StemmerDispatcher) -> Self {
        Self {
            source,
            filter,
            stemmers,
            firm_concurrency: 1,
            skip_failed_firms: false,
        }
    }

    /// Maximum number of firm text requests in flight. Rows are still
    /// written one at a time in firm order.
    pub fn with_firm_concurrency(mut self, n: usize) -> Self {
        self.firm_concurrency = n.max(1);
        self
    }

    /// Log and skip firms whose text cannot be fetched instead of failing.
    pub fn skip_failed_firms(mut self, skip: bool) -> Self {
        self.skip_failed_firms = skip;
        self
    }

    /// Stems of every accepted term of the text fields, sorted and unique.
    pub async fn build_vocabulary(&self) -> Result<Vocabulary> {
        let mut terms = BTreeSet::new();
        for field in TEXT_FIELDS {
            let field_terms = self.source.distinct_terms(field, TERMS_LOWER_BOUND).await?;
            terms.extend(field_terms.into_keys());
        }
        debug!("{} distinct terms across {:?}", terms.len(), TEXT_FIELDS);

        Ok(Vocabulary::build(
            terms.iter().map(String::as_str),
            &self.filter,
            &self.stemmers,
        ))
    }

    /// Fetch, count and append one row per firm, in `firms` order.
    pub async fn write_rows<W: Write>(
        &self,
        firms: BTreeSet<FirmId>,
        vocabulary: &Vocabulary,
        writer: &mut MatrixWriter<W>,
    ) -> Result<RowStats> {
        let mut stats = RowStats {
            firms_found: firms.len(),
            ..RowStats::default()
        };
        let total = firms.len();
        let source = &self.source;

        let mut fetches = stream::iter(firms.into_iter().enumerate())
            .map(move |(i, firm)| async move {
                let text = source.firm_text(&firm).await;
                (i, firm, text)
            })
            .buffered(self.firm_concurrency);

        while let Some((i, firm, text)) = fetches.next().await {
            info!("Processing firm {} / {} having firmId = {}", i + 1, total, firm);
            let text = match text {
                Ok(text) => text,
                Err(e) if self.skip_failed_firms => {
                    error!("Skipping firm {}: {}", firm, e);
                    stats.firms_skipped += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let row = FirmRow::from_text(firm, &text, &self.filter, &self.stemmers);
            debug!("{} distinct stems counted", row.distinct_stems());
            writer.write_row(&row, vocabulary)?;
            stats.rows_written += 1;
        }

        Ok(stats)
    }

    /// Build the columns, list the firms, then write `TDM_<timestamp>.csv`
    /// into `output_dir`.
    pub async fn run(&self, output_dir: &Path) -> Result<GenerationSummary> {
        info!("Acquiring the complete list of words indexed in Solr");
        let vocabulary = self.build_vocabulary().await?;
        info!("Matrix header holds {} stemmed words", vocabulary.len());
        if vocabulary.is_empty() {
            info!("No indexed word passed the filters; rows will hold only firm ids");
        }

        info!("Getting the complete list of firm ids in Solr");
        let firms = self.source.firm_identifiers().await?;

        let mut writer = MatrixWriter::create(output_dir, &crate::timestamp())?;
        info!("Writing matrix to {}", writer.path().display());
        writer.write_header(&vocabulary)?;

        let rows = self.write_rows(firms, &vocabulary, &mut writer).await?;
        Ok(GenerationSummary {
            columns: vocabulary.len(),
            rows,
            output: writer.path().to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::{BTreeMap, HashMap, HashSet};
    use std::path::PathBuf;

    use crate::config::WordLengthBounds;
    use crate::error::{IndexError, TdmError};
    use crate::solr::{BODY_FIELD, TITLE_FIELD};

    #[derive(Default)]
    struct MemoryIndex {
        terms: HashMap<&'static str, BTreeMap<String, u64>>,
        texts: BTreeMap<FirmId, String>,
        failing: HashSet<FirmId>,
        fetched: RefCell<Vec<FirmId>>,
        lower_bounds: RefCell<Vec<String>>,
    }

    impl IndexSource for MemoryIndex {
        async fn distinct_terms(
            &self,
            field: &str,
            lower_bound: &str,
        ) -> Result<BTreeMap<String, u64>, IndexError> {
            self.lower_bounds.borrow_mut().push(lower_bound.to_string());
            Ok(self.terms.get(field).cloned().unwrap_or_default())
        }

        async fn firm_identifiers(&self) -> Result<BTreeSet<FirmId>, IndexError> {
            Ok(self.texts.keys().chain(&self.failing).cloned().collect())
        }

        async fn firm_text(&self, firm: &FirmId) -> Result<String, IndexError> {
            self.fetched.borrow_mut().push(firm.clone());
            if self.failing.contains(firm) {
                return Err(IndexError::Shape {
                    url: "memory".into(),
                    reason: format!("no text for {firm}"),
                });
            }
            Ok(self.texts.get(firm).cloned().unwrap_or_default())
        }
    }

    fn terms(words: &[&str]) -> BTreeMap<String, u64> {
        words.iter().map(|w| (w.to_string(), 5)).collect()
    }

    fn generator(index: MemoryIndex) -> Generator<MemoryIndex> {
        Generator::new(
            index,
            WordFilter::new(WordLengthBounds { min: 3, max: 12 }),
            StemmerDispatcher::new(
                ["casa", "case"].into_iter().collect(),
                ["house", "houses"].into_iter().collect(),
            ),
        )
    }

    fn memory_writer() -> MatrixWriter<Vec<u8>> {
        MatrixWriter::new(Vec::new(), PathBuf::from("memory"))
    }

    #[tokio::test]
    async fn vocabulary_unions_both_fields() {
        let mut index = MemoryIndex::default();
        index.terms.insert(TITLE_FIELD, terms(&["casa", "house"]));
        index.terms.insert(BODY_FIELD, terms(&["houses", "zebra", "is"]));

        let vocab = generator(index).build_vocabulary().await.unwrap();
        assert_eq!(vocab.columns(), ["cas", "hous", "zebra"]);
    }

    #[tokio::test]
    async fn terms_are_listed_from_letter_a() {
        let tdm = generator(MemoryIndex::default());
        tdm.build_vocabulary().await.unwrap();
        assert_eq!(*tdm.source.lower_bounds.borrow(), ["a", "a"]);
    }

    #[tokio::test]
    async fn rows_follow_sorted_firm_order() {
        let mut index = MemoryIndex::default();
        index.terms.insert(TITLE_FIELD, terms(&["casa", "house"]));
        index.texts.insert(FirmId::new("b"), "casa casa house".into());
        index.texts.insert(FirmId::new("a"), "houses".into());
        index.texts.insert(FirmId::new("c"), "".into());

        let tdm = generator(index).with_firm_concurrency(3);
        let vocab = tdm.build_vocabulary().await.unwrap();
        let firms = tdm.source.firm_identifiers().await.unwrap();
        let mut writer = memory_writer();
        writer.write_header(&vocab).unwrap();
        let stats = tdm.write_rows(firms, &vocab, &mut writer).await.unwrap();

        assert_eq!(
            stats,
            RowStats {
                firms_found: 3,
                rows_written: 3,
                firms_skipped: 0
            }
        );
        let out = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(out, "firmId\tcas\thous\na\t0\t1\nb\t2\t1\nc\t0\t0\n");
    }

    #[tokio::test]
    async fn fetch_failure_aborts_by_default() {
        let mut index = MemoryIndex::default();
        index.texts.insert(FirmId::new("a"), "casa".into());
        index.texts.insert(FirmId::new("c"), "casa".into());
        index.failing.insert(FirmId::new("b"));

        let tdm = generator(index);
        let firms = tdm.source.firm_identifiers().await.unwrap();
        let mut writer = memory_writer();
        let err = tdm
            .write_rows(firms, &Vocabulary::default(), &mut writer)
            .await
            .unwrap_err();

        assert!(matches!(err, TdmError::Index(IndexError::Shape { .. })));
        assert_eq!(writer.rows_written(), 1);
        assert_eq!(
            *tdm.source.fetched.borrow(),
            vec![FirmId::new("a"), FirmId::new("b")]
        );
    }

    #[tokio::test]
    async fn fetch_failure_can_be_skipped() {
        let mut index = MemoryIndex::default();
        index.texts.insert(FirmId::new("a"), "casa".into());
        index.texts.insert(FirmId::new("c"), "casa".into());
        index.failing.insert(FirmId::new("b"));

        let tdm = generator(index).skip_failed_firms(true);
        let firms = tdm.source.firm_identifiers().await.unwrap();
        let mut writer = memory_writer();
        let stats = tdm
            .write_rows(firms, &Vocabulary::default(), &mut writer)
            .await
            .unwrap();

        assert_eq!(stats.rows_written, 2);
        assert_eq!(stats.firms_skipped, 1);
        let out = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(out, "a\nc\n");
    }
}
