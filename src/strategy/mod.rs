//! Processing strategy module for trip settlement
//!
//! This module defines the Strategy pattern for complete processing pipelines:
//! reading trip files, validating records into snapshots, settling each trip
//! and writing the reports. Different implementations (synchronous,
//! asynchronous concurrent) can be selected at runtime.

use crate::cli::{OutputFormat, ReportView, StrategyType};
use crate::core::SnapshotBuilder;
use crate::io::write_reports;
use crate::types::{SettlementError, TripReport};
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete settlement pipelines
///
/// Each input file holds one trip. Reports come back in input order
/// regardless of how the strategy schedules the work.
pub trait ProcessingStrategy: Send + Sync {
    /// Load and settle every trip file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An input file cannot be opened (file not found, permission denied)
    /// - A trip task fails to complete
    ///
    /// Individual record errors are logged and the record is skipped.
    fn compute(&self, inputs: &[PathBuf]) -> Result<Vec<TripReport>, SettlementError>;

    /// Settle every trip file and write the reports to output
    fn process(
        &self,
        inputs: &[PathBuf],
        format: OutputFormat,
        view: ReportView,
        output: &mut dyn Write,
    ) -> Result<(), SettlementError> {
        let reports = self.compute(inputs)?;
        write_reports(&reports, format, view, output)
    }
}

/// Create a processing strategy based on the specified strategy type
///
/// `config` is only used by the async strategy; `None` means defaults.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}

/// Trip name used in reports: the input file name without extension
pub fn trip_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Finish a snapshot and settle it
pub(crate) fn settle_trip(trip: String, builder: SnapshotBuilder) -> TripReport {
    let (snapshot, rejected) = builder.finish();
    for e in &rejected {
        tracing::warn!(trip = %trip, "Rejected expense: {}", e);
    }

    let report = snapshot.settle();
    let summary = report.summary();
    tracing::info!(
        trip = %trip,
        creditors = summary.creditors,
        debtors = summary.debtors,
        settlements = report.settlements.len(),
        "Settled trip"
    );

    TripReport { trip, report }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("trips/lisbon.csv", "lisbon")]
    #[case("porto", "porto")]
    #[case("/tmp/2024.summer.csv", "2024.summer")]
    fn test_trip_name_from_file_stem(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(trip_name(Path::new(path)), expected);
    }

    #[rstest]
    #[case(StrategyType::Sync)]
    #[case(StrategyType::Async)]
    fn test_create_strategy_missing_file_is_fatal(#[case] strategy_type: StrategyType) {
        let strategy = create_strategy(strategy_type, None);
        let error = strategy
            .compute(&[PathBuf::from("does-not-exist.csv")])
            .unwrap_err();

        assert!(error.is_fatal());
        assert_eq!(
            error,
            SettlementError::FileNotFound {
                path: "does-not-exist.csv".to_string()
            }
        );
    }
}
