//! JSON report output
//!
//! Reports are written as newline-delimited JSON: one trip per line, so the
//! output stays streamable when many trips are processed in one run.

use crate::types::{SettlementError, TripReport};
use std::io::Write;

/// Write one JSON object per trip report
pub fn write_reports_json(
    reports: &[TripReport],
    output: &mut dyn Write,
) -> Result<(), SettlementError> {
    for report in reports {
        serde_json::to_writer(&mut *output, report)?;
        writeln!(output)?;
    }
    output.flush()?;
    Ok(())
}
