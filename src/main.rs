//! Trip settlement CLI
//!
//! Reads one or more trip CSV files and prints who should pay whom.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- lisbon.csv > settlements.csv
//! cargo run -- --strategy sync lisbon.csv porto.csv
//! cargo run -- --view balances lisbon.csv
//! cargo run -- --format json --max-concurrent 4 trips/*.csv > reports.ndjson
//! ```
//!
//! Reports go to stdout, diagnostics to stderr. Set `RUST_LOG` or
//! `--log-level` to see skipped records.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use std::process;
use trip_settlement_engine::cli;
use trip_settlement_engine::strategy;

fn main() {
    let args = cli::parse_args();
    cli::init_logging(&args.log_level);

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config)
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_files, args.format, args.view, &mut output) {
        tracing::error!("{}", e);
        process::exit(1);
    }
}
