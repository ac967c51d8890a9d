//! Date token → calendar date, with year recovery for missing or garbled years.

use chrono::{Datelike, NaiveDate};

use crate::error::WatchError;
use crate::token::{DateToken, YearForm};

/// Two-digit years below the pivot land in the 2000s, the rest in the 1900s
/// (`69` reproduces the POSIX `%y` rule).
pub const DEFAULT_PIVOT: u8 = 69;

/// Tokens with a missing year and a month at or after this one belong to the
/// prior year.
pub const DEFAULT_ROLLOVER_MONTH: u32 = 12;

/// How years are resolved. The prior/current pair describes the operating
/// window and is always supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearPolicy {
    pub pivot: u8,
    pub prior_year: i32,
    pub current_year: i32,
    pub rollover_month: u32,
}

impl YearPolicy {
    pub fn new(prior_year: i32, current_year: i32) -> Self {
        Self {
            pivot: DEFAULT_PIVOT,
            prior_year,
            current_year,
            rollover_month: DEFAULT_ROLLOVER_MONTH,
        }
    }

    /// Window straddling the new year before `reference`.
    pub fn around(reference: NaiveDate) -> Self {
        Self::new(reference.year() - 1, reference.year())
    }

    pub fn with_pivot(mut self, pivot: u8) -> Self {
        self.pivot = pivot;
        self
    }

    pub fn with_rollover_month(mut self, month: u32) -> Self {
        self.rollover_month = month;
        self
    }

    pub fn expand_two_digit(&self, yy: u32) -> i32 {
        let yy = yy as i32;
        if yy < self.pivot as i32 {
            2000 + yy
        } else {
            1900 + yy
        }
    }

    pub fn fallback_year(&self, month: u32) -> i32 {
        if month >= self.rollover_month {
            self.prior_year
        } else {
            self.current_year
        }
    }
}

fn component(token: &DateToken, value: &str, what: &str) -> Result<u32, WatchError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(WatchError::malformed(
            token.as_str(),
            format!("{what} '{value}' is not a number"),
        ));
    }
    value
        .parse()
        .map_err(|_| WatchError::malformed(token.as_str(), format!("{what} '{value}' is too large")))
}

/// Parse a cleaned token into a date.
///
/// Day and month are never coerced: out-of-range values, including days past
/// the end of the month, are reported as [`WatchError::MalformedToken`].
pub fn parse_token(token: &DateToken, policy: &YearPolicy) -> Result<NaiveDate, WatchError> {
    let parts = token.components();
    if parts.len() < 2 || parts.len() > 3 {
        return Err(WatchError::malformed(
            token.as_str(),
            format!("expected D/M/Y, found {} component(s)", parts.len()),
        ));
    }

    let day = component(token, parts[0], "day")?;
    let month = component(token, parts[1], "month")?;
    if !(1..=12).contains(&month) {
        return Err(WatchError::malformed(
            token.as_str(),
            format!("month {month} out of range"),
        ));
    }

    let year = match token.year_form() {
        YearForm::TwoDigit => policy.expand_two_digit(component(token, parts[2], "year")?),
        YearForm::FourDigit => component(token, parts[2], "year")? as i32,
        YearForm::Missing => policy.fallback_year(month),
    };

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        WatchError::malformed(
            token.as_str(),
            format!("day {day} out of range for {month:02}/{year}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{normalize, Cleanup};

    fn policy() -> YearPolicy {
        YearPolicy::new(2020, 2021)
    }

    fn parse(s: &str) -> Result<NaiveDate, WatchError> {
        parse_token(&normalize(s, Cleanup::Strip).unwrap(), &policy())
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn two_digit_year() {
        assert_eq!(parse("02/01/21").unwrap(), ymd(2021, 1, 2));
        assert_eq!(parse("2/1/21").unwrap(), ymd(2021, 1, 2));
    }

    #[test]
    fn two_digit_year_pivot() {
        assert_eq!(parse("01/01/68").unwrap(), ymd(2068, 1, 1));
        assert_eq!(parse("01/01/69").unwrap(), ymd(1969, 1, 1));
        let p = policy().with_pivot(30);
        let t = normalize("01/01/45", Cleanup::Strip).unwrap();
        assert_eq!(parse_token(&t, &p).unwrap(), ymd(1945, 1, 1));
    }

    #[test]
    fn four_digit_year() {
        assert_eq!(parse("31/12/2020").unwrap(), ymd(2020, 12, 31));
        assert_eq!(parse("29/02/2024").unwrap(), ymd(2024, 2, 29));
    }

    #[test]
    fn missing_year_december_uses_prior_year() {
        assert_eq!(parse("30/12/").unwrap(), ymd(2020, 12, 30));
        assert_eq!(parse("30/12").unwrap(), ymd(2020, 12, 30));
        assert_eq!(parse("30/12/2").unwrap(), ymd(2020, 12, 30));
    }

    #[test]
    fn missing_year_other_months_use_current_year() {
        assert_eq!(parse("2/1/").unwrap(), ymd(2021, 1, 2));
        assert_eq!(parse("2/1/202").unwrap(), ymd(2021, 1, 2));
        assert_eq!(parse("2/1/20211").unwrap(), ymd(2021, 1, 2));
        assert_eq!(parse("15/11/").unwrap(), ymd(2021, 11, 15));
    }

    #[test]
    fn rollover_month_is_configurable() {
        let p = policy().with_rollover_month(11);
        let t = normalize("15/11/", Cleanup::Strip).unwrap();
        assert_eq!(parse_token(&t, &p).unwrap(), ymd(2020, 11, 15));
    }

    #[test]
    fn policy_around_reference_date() {
        let p = YearPolicy::around(ymd(2022, 1, 5));
        assert_eq!(p.prior_year, 2021);
        assert_eq!(p.current_year, 2022);
    }

    #[test]
    fn month_out_of_range_is_malformed() {
        let err = parse("15/13/2021").unwrap_err();
        assert!(matches!(err, WatchError::MalformedToken { ref token, .. } if token == "15/13/2021"));
        assert!(err.to_string().contains("month 13"));
        assert!(parse("15/0/21").is_err());
        assert!(parse("15/13/").is_err());
    }

    #[test]
    fn day_out_of_range_is_malformed() {
        assert!(parse("32/01/2021").is_err());
        assert!(parse("0/01/2021").is_err());
        assert!(parse("31/04/21").is_err());
        assert!(parse("29/02/2021").is_err());
    }

    #[test]
    fn garbage_components_are_malformed() {
        let t = normalize("ab/01/21", Cleanup::Exclusive).unwrap();
        assert!(parse_token(&t, &policy()).is_err());
        let t = normalize("02/01/2a", Cleanup::Exclusive).unwrap();
        assert!(parse_token(&t, &policy()).is_err());
        assert!(parse("/").is_err());
        assert!(parse("1/2/3/4").is_err());
    }

    #[test]
    fn exclusive_cleanup_leftover_hyphen_falls_back() {
        // "21-" has length 3, so the year is recovered from the month.
        let t = normalize("02/01/21,-", Cleanup::Exclusive).unwrap();
        assert_eq!(parse_token(&t, &policy()).unwrap(), ymd(2021, 1, 2));
    }
}
