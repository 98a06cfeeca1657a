use std::fs;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, Xlsx, open_workbook};
use chrono::Local;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use thiserror::Error;
use tracing::info;

/// Worksheet name inside the backing workbook.
const SHEET_NAME: &str = "Feedback";

/// Column headers, fixed order. The header row is the format: readers skip
/// row 1 and expect these columns in this order.
const HEADERS: [&str; 4] = ["Timestamp", "Name", "Topic", "Message"];

/// Column widths (Timestamp, Name, Topic, Message).
const COLUMN_WIDTHS: [f64; 4] = [20.0, 25.0, 20.0, 50.0];

/// Timestamp format for stored records.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Substituted when a submission leaves the name blank.
pub const NAME_PLACEHOLDER: &str = "(Not provided)";

/// Substituted when a submission leaves the topic blank.
pub const TOPIC_PLACEHOLDER: &str = "(Not specified)";

/// Errors raised by the xlsx-backed feedback store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The workbook could not be opened or parsed.
    #[error("failed to read feedback workbook: {0}")]
    Read(#[from] calamine::XlsxError),

    /// The workbook could not be generated or saved.
    #[error("failed to write feedback workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    /// The backing file exists but contains no worksheet.
    #[error("feedback workbook has no worksheet")]
    MissingSheet,

    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// One stored feedback submission.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackRecord {
    pub timestamp: String,
    pub name: String,
    pub topic: String,
    pub message: String,
}

impl FeedbackRecord {
    /// Build a record from raw submission fields, stamped with the current
    /// local time. All fields are trimmed; a blank name or topic falls back
    /// to its placeholder.
    pub fn new(name: &str, topic: &str, message: &str) -> Self {
        let name = name.trim();
        let topic = topic.trim();

        Self {
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            name: if name.is_empty() {
                NAME_PLACEHOLDER.to_string()
            } else {
                name.to_string()
            },
            topic: if topic.is_empty() {
                TOPIC_PLACEHOLDER.to_string()
            } else {
                topic.to_string()
            },
            message: message.trim().to_string(),
        }
    }
}

/// Append-only feedback store backed by a single xlsx workbook.
///
/// The workbook holds one worksheet with a fixed header row followed by one
/// row per record. The format has no incremental-append primitive, so every
/// write rewrites the whole file; callers needing exclusion across the
/// read-modify-rewrite cycle take `append` through a write lock.
#[derive(Debug)]
pub struct XlsxStorage {
    path: PathBuf,
}

impl XlsxStorage {
    /// Create a store handle for the given backing file. No I/O happens
    /// until an operation runs.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing workbook file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the backing workbook with only the header row if it does not
    /// exist yet. Idempotent, safe to call before every write; an existing
    /// file is left untouched.
    pub fn initialize(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        info!("Creating feedback workbook at {:?}", self.path);
        self.write_workbook(&[])
    }

    /// Append one record as the next free row and persist the workbook.
    ///
    /// The whole file is rewritten: current rows are read back, the record
    /// is added after them, and the result is staged to a sibling temp file
    /// and renamed over the original. The rename is the commit point; a
    /// failure before it leaves the previous saved state on disk.
    pub fn append(&mut self, record: &FeedbackRecord) -> Result<()> {
        self.initialize()?;

        let mut records = self.read_rows()?;
        records.push(record.clone());
        self.write_workbook(&records)?;

        info!(total = records.len(), "Appended feedback record");
        Ok(())
    }

    /// All stored records in insertion order. The header row is skipped, as
    /// is any row with an empty timestamp cell. A missing backing file reads
    /// as an empty store.
    pub fn list_all(&self) -> Result<Vec<FeedbackRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        self.read_rows()
    }

    /// Number of stored records.
    pub fn count(&self) -> Result<usize> {
        Ok(self.list_all()?.len())
    }

    fn read_rows(&self) -> Result<Vec<FeedbackRecord>> {
        let mut workbook: Xlsx<_> = open_workbook(&self.path)?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(StorageError::MissingSheet)?;

        let range = workbook.worksheet_range(&sheet_name)?;

        let mut records = Vec::new();
        for row in range.rows().skip(1) {
            let timestamp = cell_text(row.first());
            if timestamp.is_empty() {
                continue;
            }

            records.push(FeedbackRecord {
                timestamp,
                name: cell_text(row.get(1)),
                topic: cell_text(row.get(2)),
                message: cell_text(row.get(3)),
            });
        }

        Ok(records)
    }

    fn write_workbook(&self, records: &[FeedbackRecord]) -> Result<()> {
        let mut workbook = Workbook::new();
        let mut worksheet = Worksheet::new();
        worksheet.set_name(SHEET_NAME)?;

        let header_format = Format::new().set_bold();
        for (col, header) in HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }
        for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
            worksheet.set_column_width(col as u16, *width)?;
        }
        worksheet.set_freeze_panes(1, 0)?;

        for (idx, record) in records.iter().enumerate() {
            let row = (idx + 1) as u32;
            worksheet.write_string(row, 0, record.timestamp.as_str())?;
            worksheet.write_string(row, 1, record.name.as_str())?;
            worksheet.write_string(row, 2, record.topic.as_str())?;
            worksheet.write_string(row, 3, record.message.as_str())?;
        }

        workbook.push_worksheet(worksheet);
        let buffer = workbook.save_to_buffer()?;

        // Stage next to the target so the rename stays on one filesystem.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &buffer)?;
        fs::rename(&tmp, &self.path)?;

        Ok(())
    }
}

fn cell_text(cell: Option<&Data>) -> String {
    match cell {
        None | Some(Data::Empty) => String::new(),
        Some(Data::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use tempfile::{TempDir, tempdir};

    fn store_in(dir: &TempDir) -> XlsxStorage {
        XlsxStorage::new(dir.path().join("feedback.xlsx"))
    }

    #[test]
    fn test_initialize_creates_header_only_workbook() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store.initialize().unwrap();

        assert!(store.path().exists());
        assert!(store.list_all().unwrap().is_empty());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);

        store.initialize().unwrap();
        store
            .append(&FeedbackRecord::new("Alice", "Service", "Great"))
            .unwrap();
        store.initialize().unwrap();

        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_initialize_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let store = XlsxStorage::new(dir.path().join("nested").join("feedback.xlsx"));

        store.initialize().unwrap();

        assert!(store.path().exists());
    }

    #[test]
    fn test_append_then_list_round_trip() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);

        let record = FeedbackRecord::new("Alice", "Food", "  Great appetizers!  ");
        store.append(&record).unwrap();

        let records = store.list_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0], record);
        assert_eq!(records[0].message, "Great appetizers!");
    }

    #[test]
    fn test_append_preserves_insertion_order() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);

        for message in ["first", "second", "third"] {
            store
                .append(&FeedbackRecord::new("Alice", "Food", message))
                .unwrap();
        }

        let messages: Vec<String> = store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|r| r.message)
            .collect();
        assert_eq!(messages, ["first", "second", "third"]);
    }

    #[test]
    fn test_list_all_without_backing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.list_all().unwrap().is_empty());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_list_all_skips_rows_with_blank_timestamp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("feedback.xlsx");

        // Hand-build a workbook whose second data row lacks a timestamp.
        let mut workbook = Workbook::new();
        let mut worksheet = Worksheet::new();
        worksheet.set_name(SHEET_NAME).unwrap();
        for (col, header) in HEADERS.iter().enumerate() {
            worksheet.write_string(0, col as u16, *header).unwrap();
        }
        worksheet.write_string(1, 0, "2026-08-21 12:00:00").unwrap();
        worksheet.write_string(1, 1, "Alice").unwrap();
        worksheet.write_string(1, 2, "Food").unwrap();
        worksheet.write_string(1, 3, "Great").unwrap();
        worksheet.write_string(2, 1, "ghost").unwrap();
        worksheet.write_string(3, 0, "2026-08-21 12:05:00").unwrap();
        worksheet.write_string(3, 3, "Late entry").unwrap();
        workbook.push_worksheet(worksheet);
        workbook.save(&path).unwrap();

        let store = XlsxStorage::new(path);
        let records = store.list_all().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Alice");
        assert_eq!(records[1].message, "Late entry");
    }

    #[test]
    fn test_list_all_fails_on_unreadable_workbook() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("feedback.xlsx");
        fs::write(&path, b"not a workbook").unwrap();

        let store = XlsxStorage::new(path);
        assert!(store.list_all().is_err());
    }

    #[test]
    fn test_record_new_substitutes_placeholders() {
        let record = FeedbackRecord::new("", "   ", "Great food");

        assert_eq!(record.name, NAME_PLACEHOLDER);
        assert_eq!(record.topic, TOPIC_PLACEHOLDER);
        assert_eq!(record.message, "Great food");
    }

    #[test]
    fn test_record_new_trims_fields() {
        let record = FeedbackRecord::new("  Alice  ", " Food ", "  ok  ");

        assert_eq!(record.name, "Alice");
        assert_eq!(record.topic, "Food");
        assert_eq!(record.message, "ok");
    }

    #[test]
    fn test_record_timestamp_format() {
        let record = FeedbackRecord::new("a", "b", "c");

        assert!(NaiveDateTime::parse_from_str(&record.timestamp, TIMESTAMP_FORMAT).is_ok());
    }
}
