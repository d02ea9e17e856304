//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over trip records from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding
//! `Result<TripRecord, SettlementError>` for each CSV row:
//!
//! ```no_run
//! use trip_settlement_engine::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("lisbon.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(record) => println!("Loaded {} record", record.record_type()),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual record errors are yielded as Err variants in the iterator
//! - Line numbers are attached to every record error

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{SettlementError, TripRecord};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

/// Synchronous CSV reader
///
/// Reads one row at a time, so memory use does not grow with the file.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    line_num: u64,
}

/// Map a failure to open an input file to the matching error
pub(crate) fn open_error(path: &Path, error: std::io::Error) -> SettlementError {
    match error.kind() {
        ErrorKind::NotFound => SettlementError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => SettlementError::IoError {
            message: format!("Failed to open file '{}': {}", path.display(), error),
        },
    }
}

impl SyncReader {
    /// Create a new SyncReader from a file path
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts (trailing optional columns may be omitted)
    /// - Use an 8KB buffer for efficient I/O
    pub fn new(path: &Path) -> Result<Self, SettlementError> {
        let file = File::open(path).map_err(|e| open_error(path, e))?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 0,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<TripRecord, SettlementError>;

    /// Get the next trip record from the CSV file
    ///
    /// Line numbers count the header, so the first data row is line 2.
    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvRecord>();

        let result = deserializer.next()?;
        self.line_num += 1;
        let line = self.line_num + 1;

        Some(match result {
            Ok(csv_record) => convert_csv_record(csv_record).map_err(|e| e.at_line(line)),
            Err(e) => Err(SettlementError::ParseError {
                line: Some(line),
                message: e.to_string(),
            }),
        })
    }
}
