//! Splits free-text exposure periods into date tokens.
//!
//! Every date-like piece is taken on its own; "start - end" ranges are not
//! interpreted as spans.

use crate::token::{normalize, Cleanup, DateToken};

/// One whitespace-delimited piece of an exposure period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece<'a> {
    Date(DateToken),
    /// Time-of-day text, words, and anything else without a `/`.
    Other(&'a str),
}

/// Restartable view over one record's exposure-period text.
#[derive(Debug, Clone, Copy)]
pub struct Extractor<'a> {
    text: &'a str,
    cleanup: Cleanup,
}

impl<'a> Extractor<'a> {
    pub fn new(text: &'a str, cleanup: Cleanup) -> Self {
        Self { text, cleanup }
    }

    /// All pieces in order, date-like or not.
    pub fn pieces(&self) -> impl Iterator<Item = Piece<'a>> + 'a {
        let cleanup = self.cleanup;
        self.text
            .split_whitespace()
            .map(move |piece| match normalize(piece, cleanup) {
                Some(token) => Piece::Date(token),
                None => Piece::Other(piece),
            })
    }

    /// Date tokens only.
    pub fn tokens(&self) -> impl Iterator<Item = DateToken> + 'a {
        self.pieces().filter_map(|piece| match piece {
            Piece::Date(token) => Some(token),
            Piece::Other(_) => None,
        })
    }
}
