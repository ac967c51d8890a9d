use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::window::MatchMode;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    High,
    Medium,
    Low,
}

impl RiskTier {
    /// Concatenation order.
    pub const ALL: [RiskTier; 3] = [RiskTier::High, RiskTier::Medium, RiskTier::Low];
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        })
    }
}

/// One untagged row of an exposure-site table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SiteRow {
    pub location: String,
    pub exposure_period: String,
    pub site: String,
    pub notes: String,
    /// Remaining columns, in source order.
    pub extra: Vec<(String, String)>,
}

/// The three tables as handed over by table extraction.
#[derive(Debug, Clone, Default)]
pub struct ExposureTables {
    pub high: Vec<SiteRow>,
    pub medium: Vec<SiteRow>,
    pub low: Vec<SiteRow>,
}

impl ExposureTables {
    pub fn tier(&self, tier: RiskTier) -> &[SiteRow] {
        match tier {
            RiskTier::High => &self.high,
            RiskTier::Medium => &self.medium,
            RiskTier::Low => &self.low,
        }
    }

    pub fn tier_mut(&mut self, tier: RiskTier) -> &mut Vec<SiteRow> {
        match tier {
            RiskTier::High => &mut self.high,
            RiskTier::Medium => &mut self.medium,
            RiskTier::Low => &mut self.low,
        }
    }

    pub fn len(&self) -> usize {
        self.high.len() + self.medium.len() + self.low.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Tagged records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExposureRecord {
    pub risk: RiskTier,
    /// Zero-based position within its source table.
    pub row: usize,
    pub location: String,
    pub exposure_period: String,
    pub site: String,
    pub notes: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<(String, String)>,
}

impl ExposureRecord {
    pub fn tagged(risk: RiskTier, row: usize, source: &SiteRow) -> Self {
        Self {
            risk,
            row,
            location: source.location.clone(),
            exposure_period: source.exposure_period.clone(),
            site: source.site.clone(),
            notes: source.notes.clone(),
            extra: source.extra.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchedRecord {
    pub record: ExposureRecord,
    pub matched_date: NaiveDate,
}

/// A record skipped because its exposure period held a malformed date.
#[derive(Debug, Clone, Serialize)]
pub struct RecordFailure {
    pub risk: RiskTier,
    pub row: usize,
    pub exposure_period: String,
    pub token: String,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct WatchSummary {
    pub total_records: usize,
    pub matched: usize,
    pub missed: usize,
    pub no_date: usize,
    pub malformed: usize,
    pub matched_by_tier: BTreeMap<RiskTier, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WatchMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub target_dates: Vec<NaiveDate>,
    pub match_mode: MatchMode,
}

#[derive(Debug, Clone, Serialize)]
pub struct WatchResult {
    pub meta: WatchMeta,
    pub summary: WatchSummary,
    pub matches: Vec<MatchedRecord>,
    pub failures: Vec<RecordFailure>,
}
