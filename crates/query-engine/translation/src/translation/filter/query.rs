//! The filter document: an ordered mapping of field names and connectives to operands.

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde::{de, Deserialize, Deserializer};

use query_engine_sql::sql::value::{Timestamp, Value};

use crate::translation::error::Error;

/// The key of a single-entry object that marks a date-like scalar.
pub const DATE_KEY: &str = "$date";

const NAIVE_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// A filter. Entries are compiled in insertion order and conjoined with `AND`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query(IndexMap<String, Operand>);

/// The value attached to a key of a `Query`.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Timestamp(Timestamp),
    Array(Vec<Operand>),
    /// A field filter, or a nested query inside a connective.
    Object(Query),
}

impl Query {
    pub fn new() -> Query {
        Query::default()
    }

    /// Add an entry, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, operand: impl Into<Operand>) -> Query {
        self.insert(key, operand);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, operand: impl Into<Operand>) -> Option<Operand> {
        self.0.insert(key.into(), operand.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Operand)> {
        self.0.iter().map(|(key, operand)| (key.as_str(), operand))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Read a filter from JSON. `null` is the vacuous filter.
    pub fn from_json(value: serde_json::Value) -> Result<Option<Query>, Error> {
        match value {
            serde_json::Value::Null => Ok(None),
            value => Query::try_from(value).map(Some),
        }
    }
}

impl<K: Into<String>, O: Into<Operand>> FromIterator<(K, O)> for Query {
    fn from_iter<T: IntoIterator<Item = (K, O)>>(iter: T) -> Self {
        Query(
            iter.into_iter()
                .map(|(key, operand)| (key.into(), operand.into()))
                .collect(),
        )
    }
}

impl TryFrom<serde_json::Value> for Query {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Object(entries) => Query::try_from(entries),
            other => Err(Error::NotAFilter(json_kind(&other))),
        }
    }
}

impl TryFrom<serde_json::Map<String, serde_json::Value>> for Query {
    type Error = Error;

    fn try_from(entries: serde_json::Map<String, serde_json::Value>) -> Result<Self, Self::Error> {
        entries
            .into_iter()
            .map(|(key, value)| Ok((key, Operand::try_from(value)?)))
            .collect::<Result<IndexMap<_, _>, Error>>()
            .map(Query)
    }
}

impl FromStr for Query {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: serde_json::Value = serde_json::from_str(s)?;
        Query::try_from(value)
    }
}

impl<'de> Deserialize<'de> for Query {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Query::try_from(value).map_err(de::Error::custom)
    }
}

impl Operand {
    pub fn kind(&self) -> &'static str {
        match self {
            Operand::Null => "null",
            Operand::Bool(_) => "boolean",
            Operand::Number(_) => "number",
            Operand::String(_) => "string",
            Operand::Timestamp(_) => "date",
            Operand::Array(_) => "array",
            Operand::Object(_) => "object",
        }
    }

    /// The literal value of this operand. Objects have none.
    pub fn to_value(&self) -> Option<Value> {
        match self {
            Operand::Null => Some(Value::Null),
            Operand::Bool(b) => Some(Value::Bool(*b)),
            Operand::Number(n) => Some(Value::Number(n.clone())),
            Operand::String(s) => Some(Value::String(s.clone())),
            Operand::Timestamp(ts) => Some(Value::Timestamp(*ts)),
            Operand::Array(items) => items
                .iter()
                .map(Operand::to_value)
                .collect::<Option<Vec<_>>>()
                .map(Value::List),
            Operand::Object(_) => None,
        }
    }
}

impl TryFrom<serde_json::Value> for Operand {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Ok(match value {
            serde_json::Value::Null => Operand::Null,
            serde_json::Value::Bool(b) => Operand::Bool(b),
            serde_json::Value::Number(n) => Operand::Number(n),
            serde_json::Value::String(s) => Operand::String(s),
            serde_json::Value::Array(items) => Operand::Array(
                items
                    .into_iter()
                    .map(Operand::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            serde_json::Value::Object(entries) => {
                if entries.len() == 1 {
                    if let Some(date) = entries.get(DATE_KEY) {
                        return parse_date(date).map(Operand::Timestamp);
                    }
                }
                Operand::Object(Query::try_from(entries)?)
            }
        })
    }
}

/// Read the payload of `{"$date": ...}`: an RFC 3339 string, a date-time
/// without offset, a plain date, or milliseconds since the Unix epoch.
fn parse_date(value: &serde_json::Value) -> Result<Timestamp, Error> {
    match value {
        serde_json::Value::String(text) => parse_date_str(text),
        serde_json::Value::Number(millis) => millis
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|utc| Timestamp::Zoned(utc.fixed_offset()))
            .ok_or_else(|| Error::InvalidDate(millis.to_string())),
        other => Err(Error::InvalidDate(other.to_string())),
    }
}

fn parse_date_str(text: &str) -> Result<Timestamp, Error> {
    if let Ok(zoned) = DateTime::parse_from_rfc3339(text) {
        return Ok(Timestamp::Zoned(zoned));
    }
    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(Timestamp::Naive(naive));
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(Timestamp::Naive)
        .ok_or_else(|| Error::InvalidDate(text.to_string()))
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// Conversions for building filters in code //

impl From<bool> for Operand {
    fn from(value: bool) -> Self {
        Operand::Bool(value)
    }
}

impl From<i64> for Operand {
    fn from(value: i64) -> Self {
        Operand::Number(value.into())
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value).map_or(Operand::Null, Operand::Number)
    }
}

impl From<&str> for Operand {
    fn from(value: &str) -> Self {
        Operand::String(value.to_string())
    }
}

impl From<String> for Operand {
    fn from(value: String) -> Self {
        Operand::String(value)
    }
}

impl From<Timestamp> for Operand {
    fn from(value: Timestamp) -> Self {
        Operand::Timestamp(value)
    }
}

impl From<NaiveDateTime> for Operand {
    fn from(value: NaiveDateTime) -> Self {
        Operand::Timestamp(Timestamp::Naive(value))
    }
}

impl From<DateTime<FixedOffset>> for Operand {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Operand::Timestamp(Timestamp::Zoned(value))
    }
}

impl From<Query> for Operand {
    fn from(value: Query) -> Self {
        Operand::Object(value)
    }
}

impl<T: Into<Operand>> From<Vec<T>> for Operand {
    fn from(values: Vec<T>) -> Self {
        Operand::Array(values.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_key_order() {
        let query: Query = r#"{ "b": 1, "a": 2, "$or": [] }"#.parse().unwrap();
        let keys: Vec<&str> = query.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["b", "a", "$or"]);
    }

    #[test]
    fn reads_extended_json_dates() {
        let query = Query::try_from(json!({
            "naive": { "$date": "2020-02-01T10:00:00" },
            "plain": { "$date": "2020-02-01" },
            "zoned": { "$date": "2020-02-01T10:00:00+02:00" },
            "millis": { "$date": 0 },
        }))
        .unwrap();

        let kinds: Vec<&str> = query.iter().map(|(_, operand)| operand.kind()).collect();
        assert_eq!(kinds, vec!["date", "date", "date", "date"]);
    }

    #[test]
    fn date_marker_only_applies_to_single_entry_objects() {
        let query = Query::try_from(json!({ "when": { "$date": "2020-02-01", "$gt": 1 } })).unwrap();
        let (_, operand) = query.iter().next().unwrap();
        assert_eq!(operand.kind(), "object");
    }

    #[test]
    fn rejects_malformed_dates() {
        let result = Query::try_from(json!({ "when": { "$date": "yesterday" } }));
        assert!(matches!(result, Err(Error::InvalidDate(date)) if date == "yesterday"));
    }

    #[test]
    fn null_is_the_vacuous_filter() {
        assert_eq!(Query::from_json(serde_json::Value::Null).unwrap(), None);
        assert!(matches!(
            Query::from_json(json!([1, 2])),
            Err(Error::NotAFilter("array"))
        ));
    }

    #[test]
    fn objects_have_no_literal_value() {
        let operand = Operand::from(vec![Operand::from(1_i64), Operand::Object(Query::new())]);
        assert_eq!(operand.to_value(), None);
        assert_eq!(
            Operand::from(vec![1_i64, 2]).to_value(),
            Some(Value::List(vec![Value::from(1_i64), Value::from(2_i64)]))
        );
    }
}
