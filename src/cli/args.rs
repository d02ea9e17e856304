use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Settle shared trip expenses into a short list of payments
#[derive(Parser, Debug)]
#[command(name = "trip-settle")]
#[command(about = "Settle shared trip expenses into a short list of payments", long_about = None)]
pub struct CliArgs {
    /// Input CSV files, one trip per file
    #[arg(
        value_name = "INPUT",
        required = true,
        num_args = 1..,
        help = "Trip CSV files; the file name without extension names the trip"
    )]
    pub input_files: Vec<PathBuf>,

    /// Processing strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for sequential or 'async' for concurrent trips"
    )]
    pub strategy: StrategyType,

    /// Number of CSV records per read batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of CSV records per read batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of trips settled concurrently (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of trips processed concurrently (default: CPU cores)"
    )]
    pub max_concurrent_trips: Option<usize>,

    #[arg(
        long = "format",
        value_name = "FORMAT",
        default_value = "csv",
        help = "Output format: 'csv' table or 'json' (one report per line)"
    )]
    pub format: OutputFormat,

    #[arg(
        long = "view",
        value_name = "VIEW",
        default_value = "settlements",
        help = "CSV table to print: balances, settlements, matrix or stats"
    )]
    pub view: ReportView,

    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        default_value = "warn",
        help = "Log level for stderr diagnostics when RUST_LOG is not set"
    )]
    pub log_level: String,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Report output formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

/// Which table the CSV output shows
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportView {
    Balances,
    Settlements,
    Matrix,
    Stats,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments, using defaults for
    /// anything not given
    pub fn to_batch_config(&self) -> BatchConfig {
        let default = BatchConfig::default();
        BatchConfig::new(
            self.batch_size.unwrap_or(default.batch_size),
            self.max_concurrent_trips
                .unwrap_or(default.max_concurrent_trips),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::default_strategy(&["program", "input.csv"], StrategyType::Async)]
    #[case::explicit_sync(&["program", "--strategy", "sync", "input.csv"], StrategyType::Sync)]
    #[case::explicit_async(&["program", "--strategy", "async", "input.csv"], StrategyType::Async)]
    fn test_strategy_parsing(#[case] args: &[&str], #[case] expected: StrategyType) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.strategy, expected);
    }

    #[rstest]
    #[case::defaults(&["program", "input.csv"], OutputFormat::Csv, ReportView::Settlements)]
    #[case::json(&["program", "--format", "json", "input.csv"], OutputFormat::Json, ReportView::Settlements)]
    #[case::balances(&["program", "--view", "balances", "input.csv"], OutputFormat::Csv, ReportView::Balances)]
    #[case::matrix(&["program", "--view", "matrix", "input.csv"], OutputFormat::Csv, ReportView::Matrix)]
    #[case::stats(&["program", "--view", "stats", "input.csv"], OutputFormat::Csv, ReportView::Stats)]
    fn test_output_parsing(
        #[case] args: &[&str],
        #[case] format: OutputFormat,
        #[case] view: ReportView,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.format, format);
        assert_eq!(parsed.view, view);
    }

    #[test]
    fn test_multiple_input_files() {
        let parsed = CliArgs::try_parse_from(["program", "lisbon.csv", "porto.csv"]).unwrap();
        assert_eq!(
            parsed.input_files,
            vec![PathBuf::from("lisbon.csv"), PathBuf::from("porto.csv")]
        );
        assert_eq!(parsed.log_level, "warn");
    }

    #[rstest]
    #[case::all_defaults(&["program", "input.csv"], 1000, num_cpus::get())]
    #[case::custom_batch_size(&["program", "--batch-size", "2000", "input.csv"], 2000, num_cpus::get())]
    #[case::custom_max_concurrent(&["program", "--max-concurrent", "8", "input.csv"], 1000, 8)]
    #[case::zero_batch_size(&["program", "--batch-size", "0", "input.csv"], 1000, num_cpus::get())]
    #[case::zero_max_concurrent(&["program", "--max-concurrent", "0", "input.csv"], 1000, num_cpus::get())]
    fn test_batch_config_conversion(
        #[case] args: &[&str],
        #[case] expected_batch_size: usize,
        #[case] expected_max_concurrent: usize,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        let config = parsed.to_batch_config();

        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.max_concurrent_trips, expected_max_concurrent);
    }

    #[rstest]
    #[case::missing_input(&["program"])]
    #[case::invalid_strategy(&["program", "--strategy", "invalid", "input.csv"])]
    #[case::invalid_format(&["program", "--format", "xml", "input.csv"])]
    #[case::invalid_view(&["program", "--view", "ledger", "input.csv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        assert!(CliArgs::try_parse_from(args).is_err());
    }

    #[test]
    fn test_help_describes_greedy_plan() {
        use clap::CommandFactory;

        let about = CliArgs::command().get_about().map(|a| a.to_string());
        assert_eq!(
            about.as_deref(),
            Some("Settle shared trip expenses into a short list of payments")
        );
    }
}
