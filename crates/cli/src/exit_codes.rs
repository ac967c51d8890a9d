//! CLI Exit Code Registry
//!
//! Single source of truth for `sitewatch` exit codes. Scripts and cron jobs
//! rely on them to decide whether to alert.
//!
//! | Code | Meaning                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | Success, no record in window                             |
//! | 1    | General error (unreadable table, CSV error, IO)          |
//! | 2    | Usage or config error (bad args, bad TOML, bad dates)    |
//! | 3    | At least one record in window                            |
//! | 4    | Nothing in window, but records were skipped as malformed |

use sitewatch_recon::WatchError;

/// Success - command completed, nothing to report.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - tables could not be read or parsed.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, invalid config, unparseable target dates.
pub const EXIT_USAGE: u8 = 2;

/// One or more records fall on a watched date.
pub const EXIT_WATCH_MATCHED: u8 = 3;

/// No match, but malformed dates meant some records could not be checked.
pub const EXIT_WATCH_MALFORMED: u8 = 4;

/// Map an engine error to its exit code.
pub fn watch_exit_code(err: &WatchError) -> u8 {
    match err {
        WatchError::ConfigParse(_)
        | WatchError::ConfigValidation(_)
        | WatchError::EmptyTargetDateSet
        | WatchError::TargetDate { .. } => EXIT_USAGE,
        WatchError::MalformedToken { .. } => EXIT_WATCH_MALFORMED,
        WatchError::MissingColumn { .. } | WatchError::Csv { .. } | WatchError::Io(_) => EXIT_ERROR,
    }
}
