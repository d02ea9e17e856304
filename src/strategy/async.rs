//! Asynchronous concurrent processing strategy
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_trips)
//!     ├── AsyncReader (batch CSV reading per trip file)
//!     ├── SnapshotBuilder (record validation per trip)
//!     └── tokio task per trip (settlement computation)
//! ```
//!
//! Trips share no state, so each one is read and settled independently.
//! At most `max_concurrent_trips` trips are in flight at once and reports
//! are yielded in input order.

use crate::core::SnapshotBuilder;
use crate::io::async_reader::AsyncReader;
use crate::io::sync_reader::open_error;
use crate::strategy::{settle_trip, trip_name, ProcessingStrategy};
use crate::types::{SettlementError, TripReport};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::path::PathBuf;
use tokio_util::compat::TokioAsyncReadCompatExt;

/// Configuration for concurrent processing
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of CSV records read per batch
    pub batch_size: usize,
    /// Maximum number of trips processed concurrently
    pub max_concurrent_trips: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_trips: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig; zero values fall back to the defaults
    pub fn new(batch_size: usize, max_concurrent_trips: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size,
                default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_trips = if max_concurrent_trips == 0 {
            tracing::warn!(
                "Invalid max_concurrent_trips ({}), using default ({})",
                max_concurrent_trips,
                default.max_concurrent_trips
            );
            default.max_concurrent_trips
        } else {
            max_concurrent_trips
        };

        Self {
            batch_size,
            max_concurrent_trips,
        }
    }
}

/// Asynchronous processing strategy
///
/// Reads trip files with csv-async on a multi-threaded tokio runtime and
/// settles every trip on its own task.
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }
}

/// Read one trip file into a snapshot builder
async fn read_trip(
    path: PathBuf,
    batch_size: usize,
) -> Result<(String, SnapshotBuilder), SettlementError> {
    let trip = trip_name(&path);
    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|e| open_error(&path, e))?;

    let mut reader = AsyncReader::new(file.compat());
    let mut builder = SnapshotBuilder::new();

    loop {
        let batch = reader.read_batch(batch_size).await;
        if batch.is_empty() {
            break;
        }

        for record in batch {
            if let Err(e) = builder.process(record) {
                tracing::warn!(trip = %trip, "Skipping record: {}", e);
            }
        }
    }

    Ok((trip, builder))
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn compute(&self, inputs: &[PathBuf]) -> Result<Vec<TripReport>, SettlementError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_trips)
            .build()
            .map_err(|e| SettlementError::IoError {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        let batch_size = self.config.batch_size;

        runtime.block_on(async {
            let trips = inputs.iter().cloned().map(|path| async move {
                let (trip, builder) = read_trip(path, batch_size).await?;

                tokio::spawn(async move { settle_trip(trip, builder) })
                    .await
                    .map_err(|e| SettlementError::TaskFailed {
                        message: e.to_string(),
                    })
            });

            stream::iter(trips)
                .buffered(self.config.max_concurrent_trips)
                .try_collect::<Vec<_>>()
                .await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::SyncProcessingStrategy;
    use rstest::rstest;
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

    const DINNER: &str = "type,id,member,to,amount,name\n\
                          member,a,,,,Alice\n\
                          member,b,,,,Bob\n\
                          member,c,,,,Carol\n\
                          expense,e1,a,,300.00,Dinner\n\
                          split,e1,a,,100.00,\n\
                          split,e1,b,,100.00,\n\
                          split,e1,c,,100.00,\n\
                          transfer,t1,c,a,40.00,\n";

    #[rstest]
    #[case::zero_batch_size(0, 4, 1000, 4)]
    #[case::zero_concurrency(500, 0, 500, num_cpus::get())]
    #[case::custom(10, 2, 10, 2)]
    fn test_batch_config_zero_values_fallback(
        #[case] batch_size: usize,
        #[case] max_concurrent: usize,
        #[case] expected_batch_size: usize,
        #[case] expected_max_concurrent: usize,
    ) {
        let config = BatchConfig::new(batch_size, max_concurrent);
        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.max_concurrent_trips, expected_max_concurrent);
    }

    #[test]
    fn test_async_strategy_settles_trip() {
        let file = create_temp_csv(DINNER);
        let strategy = AsyncProcessingStrategy::new(BatchConfig::default());

        let reports = strategy.compute(&[file.path().to_path_buf()]).unwrap();
        let plan: Vec<(&str, &str, _)> = reports[0]
            .report
            .settlements
            .iter()
            .map(|s| (s.from.as_str(), s.to.as_str(), s.amount))
            .collect();

        assert_eq!(plan, vec![("b", "a", dec!(100.00)), ("c", "a", dec!(60.00))]);
    }

    #[test]
    fn test_async_strategy_small_batches_match_sync() {
        let file = create_temp_csv(DINNER);
        let inputs = vec![file.path().to_path_buf()];

        let strategy = AsyncProcessingStrategy::new(BatchConfig::new(2, 2));
        let async_reports = strategy.compute(&inputs).unwrap();
        let sync_reports = SyncProcessingStrategy.compute(&inputs).unwrap();

        assert_eq!(async_reports, sync_reports);
    }

    #[test]
    fn test_async_strategy_keeps_input_order() {
        let files: Vec<NamedTempFile> = (0..6)
            .map(|i| {
                create_temp_csv(&format!(
                    "type,id,member,to,amount,name\nmember,m{},,,,Member {}\n",
                    i, i
                ))
            })
            .collect();
        let inputs: Vec<PathBuf> = files.iter().map(|f| f.path().to_path_buf()).collect();

        let strategy = AsyncProcessingStrategy::new(BatchConfig::new(1, 3));
        let reports = strategy.compute(&inputs).unwrap();

        let firsts: Vec<&str> = reports
            .iter()
            .map(|r| r.report.balances[0].member_id.as_str())
            .collect();
        assert_eq!(firsts, vec!["m0", "m1", "m2", "m3", "m4", "m5"]);
    }

    #[test]
    fn test_async_strategy_missing_file_fails_run() {
        let file = create_temp_csv(DINNER);
        let strategy = AsyncProcessingStrategy::new(BatchConfig::default());

        let result = strategy.compute(&[file.path().to_path_buf(), PathBuf::from("missing.csv")]);
        assert!(matches!(result, Err(SettlementError::FileNotFound { .. })));
    }
}
