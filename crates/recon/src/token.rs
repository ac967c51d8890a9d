//! Cleanup of a single whitespace-delimited piece into a date token.

use serde::{Deserialize, Serialize};

/// How list and range punctuation is removed from a date-like piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cleanup {
    /// Remove commas if the piece has any, otherwise remove hyphens. Never both,
    /// so `"02/01/21,-"` keeps its hyphen.
    Exclusive,
    /// Keep only ASCII digits and `/`.
    #[default]
    Strip,
}

impl std::fmt::Display for Cleanup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exclusive => write!(f, "exclusive"),
            Self::Strip => write!(f, "strip"),
        }
    }
}

/// Shape of the year component after cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearForm {
    TwoDigit,
    FourDigit,
    /// Absent, empty, or any length other than 2 or 4.
    Missing,
}

/// A cleaned `D/M/Y` (or `D/M`) token. Components stay textual until parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateToken {
    text: String,
}

impl DateToken {
    /// Wrap text that is already clean (no list or range punctuation).
    pub(crate) fn from_clean(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn components(&self) -> Vec<&str> {
        self.text.split('/').collect()
    }

    pub fn year_form(&self) -> YearForm {
        let parts = self.components();
        if parts.len() < 3 {
            return YearForm::Missing;
        }
        match parts[parts.len() - 1].len() {
            2 => YearForm::TwoDigit,
            4 => YearForm::FourDigit,
            _ => YearForm::Missing,
        }
    }
}

/// True if the piece should be treated as a date at all.
pub fn is_date_like(piece: &str) -> bool {
    piece.contains('/')
}

/// Clean a piece into a [`DateToken`]. Returns `None` for pieces that are not
/// date-like (time ranges, words); those are skipped, not errors.
pub fn normalize(piece: &str, cleanup: Cleanup) -> Option<DateToken> {
    if !is_date_like(piece) {
        return None;
    }

    let text = match cleanup {
        Cleanup::Exclusive => {
            if piece.contains(',') {
                piece.replace(',', "")
            } else if piece.contains('-') {
                piece.replace('-', "")
            } else {
                piece.to_string()
            }
        }
        Cleanup::Strip => piece
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '/')
            .collect(),
    };

    Some(DateToken { text })
}
