//! BOQ audit CLI entry point.

use std::io::{self, IsTerminal};

use clap::Parser;

use boq_cli::cli::{Cli, Command, LogFormatArg};
use boq_cli::commands::run_audit;
use boq_cli::logging::{LogConfig, LogFormat, init_logging};
use boq_cli::summary::print_summary;
use boq_model::Classification;

fn main() {
    let cli = Cli::parse();
    init_logging(&log_config_from_cli(&cli));

    let exit_code = match cli.command {
        Command::Audit(args) => match run_audit(&args) {
            Ok(outcome) => {
                print_summary(&outcome);
                // RED positions make the audit fail for CI-style use
                if outcome.stats.count_of(Classification::Red) > 0 {
                    1
                } else {
                    0
                }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
    };
    std::process::exit(exit_code);
}

fn log_config_from_cli(cli: &Cli) -> LogConfig {
    LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        use_env_filter: !cli.verbosity.is_present(),
        format: match cli.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        },
        with_ansi: io::stderr().is_terminal(),
    }
}
