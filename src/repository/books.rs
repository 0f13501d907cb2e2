//! Books repository backed by a comma-delimited text file

use std::fs;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};

use crate::{error::AppResult, models::book::Book};

/// Column order of the catalog file
pub const HEADER: [&str; 5] = ["BookID", "Title", "Author", "TotalCopies", "AvailableCopies"];

/// Why a row (or the whole file) was not loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDiagnostic {
    /// 1-based line in the file, `None` when the whole file is affected
    pub line: Option<u64>,
    pub reason: String,
}

/// Books read from storage along with anything that had to be skipped
#[derive(Debug, Default)]
pub struct LoadReport {
    pub books: Vec<Book>,
    pub diagnostics: Vec<RowDiagnostic>,
}

impl LoadReport {
    fn degraded(reason: String) -> Self {
        tracing::warn!("Catalog load degraded to an empty collection: {}", reason);
        Self {
            books: Vec::new(),
            diagnostics: vec![RowDiagnostic { line: None, reason }],
        }
    }
}

#[derive(Debug, Clone)]
pub struct BooksRepository {
    path: PathBuf,
}

impl BooksRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every book from the file.
    ///
    /// A missing file is created with only the header. Short or unreadable
    /// rows are skipped individually; an unreadable file or a bad header
    /// yields an empty collection. Never fails.
    pub fn load(&self) -> LoadReport {
        if !self.path.exists() {
            tracing::info!("Catalog file {} not found, creating it", self.path.display());
            return match self.save(&[]) {
                Ok(()) => LoadReport::default(),
                Err(e) => LoadReport::degraded(format!("Error creating file: {}", e)),
            };
        }

        match self.read_rows() {
            Ok(report) => {
                tracing::info!(
                    "Loaded {} book(s) from {} ({} row(s) skipped)",
                    report.books.len(),
                    self.path.display(),
                    report.diagnostics.len()
                );
                report
            }
            Err(e) => LoadReport::degraded(format!("An error occurred during file loading: {}", e)),
        }
    }

    fn read_rows(&self) -> AppResult<LoadReport> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;

        let mut records = reader.records();

        match records.next() {
            Some(Ok(header)) if is_expected_header(&header) => {}
            Some(Ok(header)) => {
                return Ok(LoadReport::degraded(format!(
                    "Unexpected header {:?}",
                    header.iter().collect::<Vec<_>>()
                )));
            }
            Some(Err(e)) => return Err(e.into()),
            None => return Ok(LoadReport::degraded("File has no header row".to_string())),
        }

        let mut report = LoadReport::default();
        for result in records {
            match result {
                Ok(record) => {
                    let line = record.position().map(|p| p.line());
                    match book_from_record(&record) {
                        Some(book) => report.books.push(book),
                        None => {
                            let reason = format!(
                                "Missing required fields in row {:?}",
                                record.iter().collect::<Vec<_>>()
                            );
                            skip(&mut report, line, reason);
                        }
                    }
                }
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    let line = e.position().map(|p| p.line());
                    skip(&mut report, line, e.to_string());
                }
            }
        }

        Ok(report)
    }

    /// Overwrite the file with the header followed by every book, in order
    pub fn save(&self, books: &[Book]) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = WriterBuilder::new().has_headers(false).from_path(&self.path)?;
        writer.write_record(HEADER)?;
        for book in books {
            writer.serialize(book)?;
        }
        writer.flush()?;

        tracing::debug!("Wrote {} book(s) to {}", books.len(), self.path.display());
        Ok(())
    }
}

fn is_expected_header(record: &StringRecord) -> bool {
    record.len() >= HEADER.len()
        && record
            .iter()
            .zip(HEADER)
            .all(|(field, expected)| field.trim().trim_start_matches('\u{feff}') == expected)
}

fn book_from_record(record: &StringRecord) -> Option<Book> {
    match record.iter().take(HEADER.len()).collect::<Vec<_>>()[..] {
        [id, title, author, total, available] => {
            Some(Book::from_fields(id, title, author, total, available))
        }
        _ => None,
    }
}

fn skip(report: &mut LoadReport, line: Option<u64>, reason: String) {
    tracing::warn!("Skipping corrupted book record at line {:?}: {}", line, reason);
    report.diagnostics.push(RowDiagnostic { line, reason });
}
