//! `sitewatch run | check | parse`.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Datelike;
use sitewatch_recon::config::YearConfig;
use sitewatch_recon::load::load_tables;
use sitewatch_recon::model::{ExposureTables, RiskTier};
use sitewatch_recon::parser::parse_token;
use sitewatch_recon::token::{normalize, Cleanup, YearForm};
use sitewatch_recon::{WatchConfig, WatchError};

use crate::exit_codes::{EXIT_WATCH_MALFORMED, EXIT_WATCH_MATCHED};
use crate::report::write_report;
use crate::CliError;

fn read_config(config_path: &Path) -> Result<WatchConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path).map_err(|e| {
        CliError::usage(format!("cannot read config {}: {e}", config_path.display()))
            .with_hint("pass the path to a watch .toml file")
    })?;
    Ok(WatchConfig::from_toml(&config_str)?)
}

/// Load the tier tables, resolving paths relative to the config file's directory.
fn read_tables(config_path: &Path, config: &WatchConfig) -> Result<ExposureTables, CliError> {
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let tables = load_tables(&config.columns, |tier| {
        let csv_path = base_dir.join(&config.tables.tier(tier).file);
        tracing::debug!(%tier, path = %csv_path.display(), "reading table");
        std::fs::read_to_string(&csv_path)
            .map_err(|e| WatchError::Io(format!("cannot read {}: {e}", csv_path.display())))
    })?;
    Ok(tables)
}

pub fn cmd_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
    dates: Vec<String>,
) -> Result<(), CliError> {
    let mut config = read_config(&config_path)?;
    if !dates.is_empty() {
        config.target_dates = dates;
        config.validate()?;
    }

    let tables = read_tables(&config_path, &config)?;
    let result = sitewatch_recon::run(&config, &tables)?;

    if json_output || output_file.is_some() {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;

        if let Some(ref path) = output_file {
            std::fs::write(path, &json_str)
                .map_err(|e| CliError::io(format!("cannot write output: {e}")))?;
            eprintln!("wrote {}", path.display());
        }

        if json_output {
            println!("{json_str}");
        }
    }

    if !json_output {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        write_report(&mut handle, &result).map_err(|e| CliError::io(e.to_string()))?;
    }

    let s = &result.summary;
    eprintln!(
        "{} records: {} in window, {} outside, {} without a date, {} malformed",
        s.total_records, s.matched, s.missed, s.no_date, s.malformed,
    );

    if s.matched > 0 {
        return Err(CliError::silent(EXIT_WATCH_MATCHED));
    }
    if s.malformed > 0 {
        return Err(CliError::silent(EXIT_WATCH_MALFORMED));
    }
    Ok(())
}

pub fn cmd_check(config_path: PathBuf) -> Result<(), CliError> {
    let config = read_config(&config_path)?;
    let targets = config.target_set()?;
    let tables = read_tables(&config_path, &config)?;

    let (start, end) = targets.bounds();
    println!(
        "{}: {} watch date(s), {} to {}",
        config.name,
        targets.len(),
        start.format("%d/%m/%Y"),
        end.format("%d/%m/%Y"),
    );
    println!("  match mode {}, cleanup {}", config.match_mode, config.cleanup);
    for tier in RiskTier::ALL {
        println!(
            "  {:<6} {:>5} row(s)  {}",
            tier,
            tables.tier(tier).len(),
            config.tables.tier(tier).file
        );
    }
    Ok(())
}

pub fn cmd_parse(
    tokens: Vec<String>,
    config_path: Option<PathBuf>,
    current_year: Option<i32>,
) -> Result<(), CliError> {
    let (policy, cleanup) = match config_path {
        Some(path) => {
            let config = read_config(&path)?;
            (config.year.policy()?, config.cleanup)
        }
        None => {
            let current = current_year.unwrap_or_else(|| chrono::Local::now().year());
            (YearConfig::with_current(current).policy()?, Cleanup::default())
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut malformed = 0usize;

    for raw in &tokens {
        let line = match normalize(raw, cleanup) {
            None => format!("{raw}\tnot a date"),
            Some(token) => match parse_token(&token, &policy) {
                Ok(date) => {
                    let how = match token.year_form() {
                        YearForm::TwoDigit => "two-digit year",
                        YearForm::FourDigit => "four-digit year",
                        YearForm::Missing => "year recovered",
                    };
                    format!("{raw}\t{}\t{how}", date.format("%Y-%m-%d"))
                }
                Err(e) => {
                    malformed += 1;
                    format!("{raw}\t{e}")
                }
            },
        };
        writeln!(out, "{line}").map_err(|e| CliError::io(e.to_string()))?;
    }

    if malformed > 0 {
        return Err(CliError {
            code: EXIT_WATCH_MALFORMED,
            message: format!("{malformed} of {} token(s) malformed", tokens.len()),
            hint: None,
        });
    }
    Ok(())
}
