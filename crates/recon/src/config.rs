use std::ops::RangeInclusive;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::WatchError;
use crate::model::RiskTier;
use crate::parser::{YearPolicy, DEFAULT_PIVOT, DEFAULT_ROLLOVER_MONTH};
use crate::token::Cleanup;
use crate::window::{MatchMode, MatchPolicy, TargetDateSet};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    pub name: String,
    /// `DD/MM/YY` strings.
    pub target_dates: Vec<String>,
    #[serde(default)]
    pub match_mode: MatchMode,
    #[serde(default)]
    pub cleanup: Cleanup,
    #[serde(default)]
    pub on_malformed: MalformedPolicy,
    pub year: YearConfig,
    pub tables: TablesConfig,
    #[serde(default)]
    pub columns: ColumnMapping,
}

/// What a run does with a record whose exposure period holds a malformed date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Log it, list it under `failures`, keep going.
    #[default]
    Skip,
    /// Fail the whole run.
    Abort,
}

// ---------------------------------------------------------------------------
// Year policy
// ---------------------------------------------------------------------------

/// Either `current` (with optional `prior`) or `reference_date`.
#[derive(Debug, Clone, Deserialize)]
pub struct YearConfig {
    #[serde(default = "default_pivot")]
    pub pivot: u8,
    #[serde(default)]
    pub prior: Option<i32>,
    #[serde(default)]
    pub current: Option<i32>,
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
    #[serde(default = "default_rollover_month")]
    pub rollover_month: u32,
}

fn default_pivot() -> u8 {
    DEFAULT_PIVOT
}

fn default_rollover_month() -> u32 {
    DEFAULT_ROLLOVER_MONTH
}

/// Years a fallback may resolve to.
const YEAR_RANGE: RangeInclusive<i32> = 1..=9999;

fn out_of_range(key: &str, year: i32) -> WatchError {
    WatchError::ConfigValidation(format!(
        "{key} must be in {}..={}, got {year}",
        YEAR_RANGE.start(),
        YEAR_RANGE.end()
    ))
}

fn check_year(key: &str, year: i32) -> Result<(), WatchError> {
    if YEAR_RANGE.contains(&year) {
        Ok(())
    } else {
        Err(out_of_range(key, year))
    }
}

impl YearConfig {
    /// Anchor on `current` alone, everything else default.
    pub fn with_current(current: i32) -> Self {
        Self {
            pivot: DEFAULT_PIVOT,
            prior: None,
            current: Some(current),
            reference_date: None,
            rollover_month: DEFAULT_ROLLOVER_MONTH,
        }
    }

    pub fn policy(&self) -> Result<YearPolicy, WatchError> {
        if self.pivot > 100 {
            return Err(WatchError::ConfigValidation(format!(
                "year.pivot must be 0..=100, got {}",
                self.pivot
            )));
        }
        if !(1..=12).contains(&self.rollover_month) {
            return Err(WatchError::ConfigValidation(format!(
                "year.rollover_month must be 1..=12, got {}",
                self.rollover_month
            )));
        }

        let policy = match (self.reference_date, self.current) {
            (Some(_), Some(_)) => {
                return Err(WatchError::ConfigValidation(
                    "year: set either reference_date or current, not both".into(),
                ))
            }
            (Some(reference), None) => {
                if self.prior.is_some() {
                    return Err(WatchError::ConfigValidation(
                        "year.prior cannot be combined with reference_date".into(),
                    ));
                }
                let policy = YearPolicy::around(reference);
                check_year("year.reference_date (prior year)", policy.prior_year)?;
                check_year("year.reference_date", policy.current_year)?;
                policy
            }
            (None, Some(current)) => {
                check_year("year.current", current)?;
                let prior = match self.prior {
                    Some(prior) => prior,
                    None => current
                        .checked_sub(1)
                        .ok_or_else(|| out_of_range("year.current", current))?,
                };
                check_year("year.prior", prior)?;
                YearPolicy::new(prior, current)
            }
            (None, None) => {
                return Err(WatchError::ConfigValidation(
                    "year: one of reference_date or current is required".into(),
                ))
            }
        };

        if policy.prior_year >= policy.current_year {
            return Err(WatchError::ConfigValidation(format!(
                "year.prior ({}) must be before year.current ({})",
                policy.prior_year, policy.current_year
            )));
        }

        Ok(policy
            .with_pivot(self.pivot)
            .with_rollover_month(self.rollover_month))
    }
}

// ---------------------------------------------------------------------------
// Tables + columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct TablesConfig {
    pub high: TableConfig,
    pub medium: TableConfig,
    pub low: TableConfig,
}

impl TablesConfig {
    pub fn tier(&self, tier: RiskTier) -> &TableConfig {
        match tier {
            RiskTier::High => &self.high,
            RiskTier::Medium => &self.medium,
            RiskTier::Low => &self.low,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig {
    pub file: String,
}

/// Header names in the extracted tables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub location: String,
    pub exposure_period: String,
    pub site: String,
    pub notes: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            location: "Location".into(),
            exposure_period: "Exposure period".into(),
            site: "Site".into(),
            notes: "Notes".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl WatchConfig {
    pub fn from_toml(input: &str) -> Result<Self, WatchError> {
        let config: WatchConfig =
            toml::from_str(input).map_err(|e| WatchError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), WatchError> {
        self.target_set()?;
        self.year.policy()?;

        let cols = &self.columns;
        for (key, value) in [
            ("location", &cols.location),
            ("exposure_period", &cols.exposure_period),
            ("site", &cols.site),
            ("notes", &cols.notes),
        ] {
            if value.trim().is_empty() {
                return Err(WatchError::ConfigValidation(format!(
                    "columns.{key} must not be empty"
                )));
            }
        }

        for tier in RiskTier::ALL {
            if self.tables.tier(tier).file.trim().is_empty() {
                return Err(WatchError::ConfigValidation(format!(
                    "tables.{tier}.file must not be empty"
                )));
            }
        }

        Ok(())
    }

    pub fn target_set(&self) -> Result<TargetDateSet, WatchError> {
        TargetDateSet::parse_with_pivot(&self.target_dates, self.year.pivot)
    }

    pub fn match_policy(&self) -> Result<MatchPolicy, WatchError> {
        Ok(MatchPolicy::new(self.year.policy()?)
            .with_mode(self.match_mode)
            .with_cleanup(self.cleanup))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
