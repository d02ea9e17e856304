// CLI module
// Command-line interface, argument parsing and log setup

mod args;

pub use args::{CliArgs, OutputFormat, ReportView, StrategyType};

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse command-line arguments using clap
///
/// On invalid arguments or `--help`, clap prints the message and exits.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Install the stderr log subscriber
///
/// `RUST_LOG` takes precedence over `default_level`. Stdout stays reserved
/// for report output. If a global subscriber is already set, the failure is
/// reported on stderr and the existing one stays in place.
pub fn init_logging(default_level: &str) {
    let installed = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init();

    if let Err(e) = installed {
        eprintln!("Failed to initialize logging: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_logging_init_keeps_running() {
        init_logging("warn");
        init_logging("debug");
        tracing::warn!("still logging after a repeated init");
    }
}
