//! Synchronous processing strategy
//!
//! Settles trips one after another on the calling thread. Delegates:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Validation to `SnapshotBuilder`
//! - Settlement to `TripSnapshot::settle`
//!
//! Each file is streamed record by record; only the snapshot itself is
//! kept in memory.

use crate::core::SnapshotBuilder;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{settle_trip, trip_name, ProcessingStrategy};
use crate::types::{SettlementError, TripReport};
use std::path::{Path, PathBuf};

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use trip_settlement_engine::cli::{OutputFormat, ReportView};
/// use trip_settlement_engine::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::PathBuf;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy;
/// let mut output = io::stdout();
///
/// strategy
///     .process(
///         &[PathBuf::from("lisbon.csv")],
///         OutputFormat::Csv,
///         ReportView::Settlements,
///         &mut output,
///     )
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl SyncProcessingStrategy {
    fn load_trip(&self, path: &Path) -> Result<TripReport, SettlementError> {
        let trip = trip_name(path);
        let reader = SyncReader::new(path)?;
        let mut builder = SnapshotBuilder::new();

        for result in reader {
            match result {
                Ok(record) => {
                    if let Err(e) = builder.process(record) {
                        tracing::warn!(trip = %trip, "Skipping record: {}", e);
                    }
                }
                Err(e) => tracing::warn!(trip = %trip, "Skipping row: {}", e),
            }
        }

        Ok(settle_trip(trip, builder))
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn compute(&self, inputs: &[PathBuf]) -> Result<Vec<TripReport>, SettlementError> {
        inputs.iter().map(|path| self.load_trip(path)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_sync_strategy_settles_trip() {
        let file = create_temp_csv(
            "type,id,member,to,amount,name\n\
             member,a,,,,Alice\n\
             member,b,,,,Bob\n\
             expense,e1,a,,60.00,Tickets\n\
             split,e1,a,,,\n\
             split,e1,b,,,\n",
        );

        let reports = SyncProcessingStrategy
            .compute(&[file.path().to_path_buf()])
            .unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].trip, trip_name(file.path()));
        let settlements = &reports[0].report.settlements;
        assert_eq!(settlements.len(), 1);
        assert_eq!((settlements[0].from.as_str(), settlements[0].amount), ("b", dec!(30.00)));
    }

    #[test]
    fn test_sync_strategy_continues_on_malformed_record() {
        let file = create_temp_csv(
            "type,id,member,to,amount,name\n\
             member,a,,,,Alice\n\
             member,b,,,,Bob\n\
             expense,e1,a,,oops,Broken\n\
             expense,e2,a,,20.00,Coffee\n\
             split,e2,b,,20.00,\n\
             transfer,t1,b,b,5.00,\n",
        );

        let reports = SyncProcessingStrategy
            .compute(&[file.path().to_path_buf()])
            .unwrap();

        let report = &reports[0].report;
        assert_eq!(report.total_expenses, dec!(20.00));
        assert_eq!(report.total_transfers, dec!(0));
        assert_eq!(report.settlements[0].amount, dec!(20.00));
    }

    #[test]
    fn test_sync_strategy_keeps_input_order() {
        let first = create_temp_csv("type,id,member,to,amount,name\nmember,a,,,,A\n");
        let second = create_temp_csv("type,id,member,to,amount,name\nmember,b,,,,B\n");

        let reports = SyncProcessingStrategy
            .compute(&[second.path().to_path_buf(), first.path().to_path_buf()])
            .unwrap();

        assert_eq!(reports[0].report.balances[0].member_id, "b");
        assert_eq!(reports[1].report.balances[0].member_id, "a");
    }

    #[test]
    fn test_sync_strategy_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SyncProcessingStrategy>();
    }
}
