//! I/O module
//!
//! Handles CSV parsing and report output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, report views)
//! - `json_format` - Newline-delimited JSON reports
//! - `sync_reader` - Synchronous CSV reader with iterator interface
//! - `async_reader` - Asynchronous CSV reader with batch reading interface

pub mod async_reader;
pub mod csv_format;
pub mod json_format;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{
    convert_csv_record, write_balances_csv, write_matrix_csv, write_settlements_csv,
    write_stats_csv, CsvRecord,
};
pub use json_format::write_reports_json;
pub use sync_reader::SyncReader;

use crate::cli::{OutputFormat, ReportView};
use crate::types::{SettlementError, TripReport};
use std::io::Write;

/// Write reports in the requested format
///
/// JSON always carries the full report; `view` selects the CSV table.
pub fn write_reports(
    reports: &[TripReport],
    format: OutputFormat,
    view: ReportView,
    output: &mut dyn Write,
) -> Result<(), SettlementError> {
    match (format, view) {
        (OutputFormat::Json, _) => write_reports_json(reports, output),
        (OutputFormat::Csv, ReportView::Balances) => write_balances_csv(reports, output),
        (OutputFormat::Csv, ReportView::Settlements) => write_settlements_csv(reports, output),
        (OutputFormat::Csv, ReportView::Matrix) => write_matrix_csv(reports, output),
        (OutputFormat::Csv, ReportView::Stats) => write_stats_csv(reports, output),
    }
}
