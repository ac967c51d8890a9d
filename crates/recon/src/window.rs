//! Target dates and the per-record window match.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::WatchError;
use crate::extract::{Extractor, Piece};
use crate::parser::{parse_token, YearPolicy, DEFAULT_PIVOT};
use crate::token::{Cleanup, DateToken, YearForm};

// ---------------------------------------------------------------------------
// Target dates
// ---------------------------------------------------------------------------

/// The dates being watched. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDateSet {
    dates: BTreeSet<NaiveDate>,
}

impl TargetDateSet {
    pub fn new(dates: impl IntoIterator<Item = NaiveDate>) -> Result<Self, WatchError> {
        let dates: BTreeSet<NaiveDate> = dates.into_iter().collect();
        if dates.is_empty() {
            return Err(WatchError::EmptyTargetDateSet);
        }
        Ok(Self { dates })
    }

    /// Parse `DD/MM/YY` strings using the default century pivot.
    pub fn parse<S: AsRef<str>>(values: &[S]) -> Result<Self, WatchError> {
        Self::parse_with_pivot(values, DEFAULT_PIVOT)
    }

    /// Parse `DD/MM/YY` strings. The year must be exactly two digits; day and
    /// month may drop their leading zero.
    pub fn parse_with_pivot<S: AsRef<str>>(values: &[S], pivot: u8) -> Result<Self, WatchError> {
        // Prior/current years are unused: two-digit years never fall back.
        let policy = YearPolicy::new(0, 0).with_pivot(pivot);
        let mut dates = Vec::with_capacity(values.len());
        for value in values {
            let value = value.as_ref().trim();
            let token = DateToken::from_clean(value);
            let bad = || WatchError::TargetDate {
                value: value.to_string(),
            };
            let parts = token.components();
            if parts.len() != 3
                || token.year_form() != YearForm::TwoDigit
                || parts[..2].iter().any(|p| p.is_empty() || p.len() > 2)
            {
                return Err(bad());
            }
            dates.push(parse_token(&token, &policy).map_err(|_| bad())?);
        }
        Self::new(dates)
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.dates.contains(date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Earliest and latest watched date.
    pub fn bounds(&self) -> (NaiveDate, NaiveDate) {
        // Construction guarantees at least one date.
        let first = self.dates.first().copied().unwrap_or(NaiveDate::MIN);
        let last = self.dates.last().copied().unwrap_or(first);
        (first, last)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NaiveDate> {
        self.dates.iter()
    }
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Every date-like piece is checked.
    #[default]
    AllTokens,
    /// Only the first whitespace piece is checked; a leading non-date piece
    /// means no match.
    FirstToken,
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AllTokens => write!(f, "all_tokens"),
            Self::FirstToken => write!(f, "first_token"),
        }
    }
}

/// Everything that decides how one exposure period is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPolicy {
    pub mode: MatchMode,
    pub cleanup: Cleanup,
    pub years: YearPolicy,
}

impl MatchPolicy {
    pub fn new(years: YearPolicy) -> Self {
        Self {
            mode: MatchMode::default(),
            cleanup: Cleanup::default(),
            years,
        }
    }

    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_cleanup(mut self, cleanup: Cleanup) -> Self {
        self.cleanup = cleanup;
        self
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "date", rename_all = "snake_case")]
pub enum WindowMatch {
    /// A parsed date is one of the targets.
    Hit(NaiveDate),
    /// Dates were found, none of them watched.
    Miss,
    /// No date-like piece was examined.
    NoDate,
}

impl WindowMatch {
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Hit(_))
    }

    pub fn matched_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Hit(date) => Some(*date),
            _ => None,
        }
    }
}

/// Decide whether one exposure period touches the watched dates.
///
/// In [`MatchMode::AllTokens`] the first hit wins. A malformed token is only
/// reported when no other token hits.
pub fn match_period(
    text: &str,
    targets: &TargetDateSet,
    policy: &MatchPolicy,
) -> Result<WindowMatch, WatchError> {
    let extractor = Extractor::new(text, policy.cleanup);

    match policy.mode {
        MatchMode::FirstToken => match extractor.pieces().next() {
            Some(Piece::Date(token)) => {
                let date = parse_token(&token, &policy.years)?;
                Ok(classify(date, targets))
            }
            Some(Piece::Other(_)) | None => Ok(WindowMatch::NoDate),
        },
        MatchMode::AllTokens => {
            let mut seen_date = false;
            let mut first_error = None;

            for token in extractor.tokens() {
                match parse_token(&token, &policy.years) {
                    Ok(date) if targets.contains(&date) => return Ok(WindowMatch::Hit(date)),
                    Ok(_) => seen_date = true,
                    Err(e) => {
                        if first_error.is_none() {
                            first_error = Some(e);
                        }
                    }
                }
            }

            match first_error {
                Some(e) => Err(e),
                None if seen_date => Ok(WindowMatch::Miss),
                None => Ok(WindowMatch::NoDate),
            }
        }
    }
}

fn classify(date: NaiveDate, targets: &TargetDateSet) -> WindowMatch {
    if targets.contains(&date) {
        WindowMatch::Hit(date)
    } else {
        WindowMatch::Miss
    }
}
