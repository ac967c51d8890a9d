//! `sitewatch-recon`: exposure-site date matching engine.
//!
//! Pure engine crate: receives already-extracted tables and target dates,
//! returns the records whose free-text exposure period hits a watched date.
//! No CLI or network dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod load;
pub mod model;
pub mod parser;
pub mod token;
pub mod window;

pub use config::{MalformedPolicy, WatchConfig};
pub use engine::{records_in_window, run, run_with, tag_records};
pub use error::WatchError;
pub use model::{ExposureRecord, ExposureTables, RiskTier, SiteRow, WatchResult};
pub use parser::YearPolicy;
pub use window::{match_period, MatchMode, MatchPolicy, TargetDateSet, WindowMatch};
