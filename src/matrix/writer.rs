use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, TdmError};
use crate::matrix::{FirmRow, Vocabulary, FIRM_ID_HEADER, SEPARATOR};

/// Append-only, tab-separated matrix output.
///
/// Every line is flushed as soon as it is written, so an interrupted run
/// leaves a header followed by complete rows only.
pub struct MatrixWriter<W: Write> {
    out: W,
    path: PathBuf,
    rows: usize,
}

impl MatrixWriter<BufWriter<File>> {
    /// Output file name for a run started at `timestamp`.
    pub fn file_name(timestamp: &str) -> String {
        format!("TDM_{timestamp}.csv")
    }

    /// Open (or create) `TDM_<timestamp>.csv` in `dir` for appending.
    pub fn create(dir: &Path, timestamp: &str) -> Result<Self> {
        let path = dir.join(Self::file_name(timestamp));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| TdmError::Output {
                path: path.clone(),
                source,
            })?;
        Ok(Self::new(BufWriter::new(file), path))
    }
}

impl<W: Write> MatrixWriter<W> {
    pub fn new(out: W, path: PathBuf) -> Self {
        Self { out, path, rows: 0 }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Data rows written so far.
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    pub fn write_header(&mut self, vocabulary: &Vocabulary) -> Result<()> {
        let mut line = String::from(FIRM_ID_HEADER);
        for column in vocabulary.columns() {
            line.push(SEPARATOR);
            line.push_str(column);
        }
        self.write_line(line)
    }

    pub fn write_row(&mut self, row: &FirmRow, vocabulary: &Vocabulary) -> Result<()> {
        let mut line = row.firm.to_string();
        for count in row.cells(vocabulary) {
            line.push(SEPARATOR);
            line.push_str(&count.to_string());
        }
        self.write_line(line)?;
        self.rows += 1;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, mut line: String) -> Result<()> {
        line.push('\n');
        self.try_write(line.as_bytes())
            .map_err(|source| TdmError::Output {
                path: self.path.clone(),
                source,
            })
    }

    fn try_write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.out.write_all(bytes)?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WordLengthBounds;
    use crate::solr::FirmId;
    use crate::text::{StemmerDispatcher, WordFilter};

    #[test]
    fn header_and_rows_have_matching_width() {
        let filter = WordFilter::new(WordLengthBounds { min: 3, max: 12 });
        let stemmers = StemmerDispatcher::new(
            ["casa"].into_iter().collect(),
            ["house"].into_iter().collect(),
        );
        let vocab = Vocabulary::build(["casa", "house", "zebra"], &filter, &stemmers);

        let mut writer = MatrixWriter::new(Vec::new(), PathBuf::from("memory"));
        writer.write_header(&vocab).unwrap();
        for (id, text) in [("b", "house casa casa"), ("a", "nothing here")] {
            let row = FirmRow::from_text(FirmId::new(id), text, &filter, &stemmers);
            writer.write_row(&row, &vocab).unwrap();
        }
        assert_eq!(writer.rows_written(), 2);

        let out = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines, ["firmId\tcas\thous\tzebra", "b\t2\t1\t0", "a\t0\t0\t0"]);
        for line in &lines {
            assert_eq!(line.split('\t').count(), vocab.len() + 1);
        }
    }

    #[test]
    fn create_appends_to_existing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let vocab = Vocabulary::default();

        for _ in 0..2 {
            let mut writer = MatrixWriter::create(dir.path(), "2024-01-01_00_00_00").unwrap();
            writer.write_header(&vocab).unwrap();
        }

        let path = dir.path().join("TDM_2024-01-01_00_00_00.csv");
        let out = std::fs::read_to_string(path).unwrap();
        assert_eq!(out, "firmId\nfirmId\n");
    }
}
