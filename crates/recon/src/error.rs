use std::fmt;

use crate::model::RiskTier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchError {
    /// A date-like token that is not a valid calendar date.
    MalformedToken { token: String, reason: String },
    /// No target dates were supplied.
    EmptyTargetDateSet,
    /// A target date is not in `DD/MM/YY` form.
    TargetDate { value: String },
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad pivot, rollover month, missing year policy, etc.).
    ConfigValidation(String),
    /// Missing required column in a tier's table.
    MissingColumn { tier: RiskTier, column: String },
    /// CSV read error.
    Csv { tier: RiskTier, message: String },
    /// IO error (file read, etc.).
    Io(String),
}

impl WatchError {
    pub(crate) fn malformed(token: &str, reason: impl Into<String>) -> Self {
        Self::MalformedToken {
            token: token.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for WatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedToken { token, reason } => {
                write!(f, "malformed date '{token}': {reason}")
            }
            Self::EmptyTargetDateSet => write!(f, "at least one target date is required"),
            Self::TargetDate { value } => {
                write!(f, "cannot parse target date '{value}' (expected DD/MM/YY)")
            }
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { tier, column } => {
                write!(f, "{tier} table: missing column '{column}'")
            }
            Self::Csv { tier, message } => write!(f, "{tier} table: {message}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for WatchError {}
