//! Literal values that can be substituted into a SQL template.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime};

use super::format::Error;

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Timestamp(Timestamp),
    /// Expands to a comma-separated list, e.g. for `IN (...)`.
    List(Vec<Value>),
}

impl Value {
    /// A short name of the kind of value, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Timestamp(_) => "timestamp",
            Value::List(_) => "list",
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value.into())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Number(value.into())
    }
}

/// Non-finite floats have no SQL literal and become `NULL`.
impl From<f64> for Value {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Timestamp> for Value {
    fn from(value: Timestamp) -> Self {
        Value::Timestamp(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::Timestamp(Timestamp::Naive(value))
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Value::Timestamp(Timestamp::Zoned(value))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

/// A date-like value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    /// Rendered as given.
    Naive(NaiveDateTime),
    /// Converted to the configured time zone before rendering.
    Zoned(DateTime<FixedOffset>),
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

impl Timestamp {
    /// Render as `YYYY-MM-DD HH:MM:SS.mmm` in the given time zone.
    pub fn to_sql_string(&self, time_zone: TimeZone) -> String {
        let naive = match self {
            Timestamp::Naive(naive) => *naive,
            Timestamp::Zoned(zoned) => match time_zone {
                TimeZone::Local => zoned.with_timezone(&Local).naive_local(),
                TimeZone::Utc => zoned.naive_utc(),
                TimeZone::Offset(offset) => zoned.with_timezone(&offset).naive_local(),
            },
        };
        naive.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// The time zone zoned timestamps are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeZone {
    /// The time zone of the host.
    #[default]
    Local,
    Utc,
    Offset(FixedOffset),
}

/// Parses `local`, `Z`, or an offset such as `+05:30`.
impl FromStr for TimeZone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(TimeZone::Local),
            "Z" | "z" => Ok(TimeZone::Utc),
            offset => offset
                .parse::<FixedOffset>()
                .map(TimeZone::Offset)
                .map_err(|_| Error::InvalidTimeZone(s.to_string())),
        }
    }
}

impl fmt::Display for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeZone::Local => write!(f, "local"),
            TimeZone::Utc => write!(f, "Z"),
            TimeZone::Offset(offset) => write!(f, "{offset}"),
        }
    }
}
