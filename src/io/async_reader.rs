//! Asynchronous CSV reader with batch interface
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of TripRecords
//!                  ↓
//!           csv_format module
//!           (CsvRecord, convert_csv_record)
//! ```
//!
//! Rows that fail to parse or convert are logged and skipped, the same
//! way the synchronous path treats them.

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::TripRecord;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;

/// Asynchronous CSV reader over trip records
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line_num: u64,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            line_num: 0,
        }
    }

    /// Read up to `batch_size` trip records
    ///
    /// Returns an empty vector once the input is exhausted.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<TripRecord> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while batch.len() < batch_size {
            let Some(result) = records.next().await else {
                break;
            };
            self.line_num += 1;
            let line = self.line_num + 1;

            match result {
                Ok(csv_record) => match convert_csv_record(csv_record) {
                    Ok(record) => batch.push(record),
                    Err(e) => tracing::warn!("Skipping record: {}", e.at_line(line)),
                },
                Err(e) => tracing::warn!(line, "CSV parse error: {}", e),
            }
        }

        batch
    }
}
