use chrono::{DateTime, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Decoded JSON body, returned to the caller exactly as the service sent it.
pub type ResponseBody = serde_json::Value;

/// Section of the One Call forecast that the service should leave out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Exclude {
    Current,
    Minutely,
    Hourly,
    Daily,
    Alerts,
}

impl Exclude {
    pub fn as_str(&self) -> &'static str {
        match self {
            Exclude::Current => "current",
            Exclude::Minutely => "minutely",
            Exclude::Hourly => "hourly",
            Exclude::Daily => "daily",
            Exclude::Alerts => "alerts",
        }
    }

    pub const fn all() -> &'static [Exclude] {
        &[
            Exclude::Current,
            Exclude::Minutely,
            Exclude::Hourly,
            Exclude::Daily,
            Exclude::Alerts,
        ]
    }

    /// Comma-joined wire form, in the order given. `None` when nothing is excluded.
    pub fn join(parts: &[Exclude]) -> Option<String> {
        if parts.is_empty() {
            return None;
        }

        Some(parts.iter().map(Exclude::as_str).collect::<Vec<_>>().join(","))
    }
}

impl fmt::Display for Exclude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Exclude {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Exclude::all()
            .iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| ParseTokenError::new("exclude", s, Exclude::all()))
    }
}

/// Units of measurement understood by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Standard,
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Standard => "standard",
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Standard, Units::Metric, Units::Imperial]
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Units::all()
            .iter()
            .find(|u| u.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| ParseTokenError::new("units", s, Units::all()))
    }
}

/// Returned when a string is not one of a fixed token vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'. Supported values: {expected}.")]
pub struct ParseTokenError {
    kind: &'static str,
    value: String,
    expected: String,
}

impl ParseTokenError {
    fn new<T: fmt::Display>(kind: &'static str, value: &str, expected: &[T]) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected: expected
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// A calendar date, either already in `YYYY-MM-DD` form or as a structured value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateSpec {
    /// Sent as-is; the service validates it.
    Literal(String),
    Date(NaiveDate),
}

impl DateSpec {
    pub fn to_query_value(&self) -> String {
        match self {
            DateSpec::Literal(s) => s.clone(),
            DateSpec::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        matches!(self, DateSpec::Literal(s) if s.is_empty())
    }
}

impl From<&str> for DateSpec {
    fn from(value: &str) -> Self {
        DateSpec::Literal(value.to_string())
    }
}

impl From<String> for DateSpec {
    fn from(value: String) -> Self {
        DateSpec::Literal(value)
    }
}

impl From<NaiveDate> for DateSpec {
    fn from(value: NaiveDate) -> Self {
        DateSpec::Date(value)
    }
}

/// Takes the calendar date in the value's own timezone.
impl<Tz: TimeZone> From<DateTime<Tz>> for DateSpec {
    fn from(value: DateTime<Tz>) -> Self {
        DateSpec::Date(value.date_naive())
    }
}
