// sitewatch - check exposure-site tables against a list of watch dates

mod exit_codes;
mod report;
mod watch;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use exit_codes::{watch_exit_code, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "sitewatch")]
#[command(about = "Match exposure-site tables against a list of watch dates")]
#[command(version)]
struct Cli {
    /// Log filter, e.g. "debug" or "sitewatch_recon=debug" (default: warn)
    #[arg(long, global = true, env = "SITEWATCH_LOG")]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a watch config and list the records that fall on a watched date
    #[command(after_help = "\
Examples:
  sitewatch run watch.toml
  sitewatch run watch.toml --json
  sitewatch run watch.toml --output result.json
  sitewatch run watch.toml --date 04/01/21 --date 05/01/21

Exit codes: 0 nothing in window, 3 records in window,
            4 nothing in window but malformed records skipped")]
    Run {
        /// Path to the watch .toml config
        config: PathBuf,

        /// Print JSON to stdout instead of the text report
        #[arg(long)]
        json: bool,

        /// Also write JSON to this file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Watch date (DD/MM/YY), replaces the configured list. Repeatable.
        #[arg(long = "date", value_name = "DD/MM/YY")]
        dates: Vec<String>,
    },

    /// Validate a watch config and load its tables without matching
    #[command(after_help = "\
Examples:
  sitewatch check watch.toml")]
    Check {
        /// Path to the watch .toml config
        config: PathBuf,
    },

    /// Show how date tokens are read
    #[command(after_help = "\
Examples:
  sitewatch parse 02/01/2021 2/1/21 30/12/ --current-year 2021
  sitewatch parse '15/01/2021,' --config watch.toml")]
    Parse {
        /// Tokens to parse
        #[arg(required = true)]
        tokens: Vec<String>,

        /// Take the year policy and cleanup mode from a watch config
        #[arg(long, conflicts_with = "current_year")]
        config: Option<PathBuf>,

        /// Year assumed for tokens without one (default: this year)
        #[arg(long)]
        current_year: Option<i32>,
    },
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Exit with `code` and no error line.
    pub fn silent(code: u8) -> Self {
        Self { code, message: String::new(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<sitewatch_recon::WatchError> for CliError {
    fn from(err: sitewatch_recon::WatchError) -> Self {
        use sitewatch_recon::WatchError;

        let hint = match &err {
            WatchError::TargetDate { .. } => Some("target dates are DD/MM/YY, e.g. 02/01/21".to_string()),
            WatchError::MissingColumn { .. } => {
                Some("map header names under [columns] in the watch config".to_string())
            }
            WatchError::MalformedToken { .. } => {
                Some("set on_malformed = \"skip\" to list bad rows and keep going".to_string())
            }
            _ => None,
        };
        Self { code: watch_exit_code(&err), message: err.to_string(), hint }
    }
}

fn init_logging(filter: Option<&str>) {
    let filter = filter
        .map(EnvFilter::new)
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log.as_deref());

    let result = match cli.command {
        Commands::Run { config, json, output, dates } => watch::cmd_run(config, json, output, dates),
        Commands::Check { config } => watch::cmd_check(config),
        Commands::Parse { tokens, config, current_year } => {
            watch::cmd_parse(tokens, config, current_year)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}
