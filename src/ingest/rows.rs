//! Raw ticket row shapes and value coercion.

use crate::core::{parse_instant, Timestamp};
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;

/// One already-flattened ticket row.
#[derive(Debug, Default, Deserialize)]
pub struct TicketRow {
    #[serde(alias = "id", default)]
    pub issue_id: Value,
    #[serde(default)]
    pub issue_type: Value,
    #[serde(default)]
    pub status: Value,
    #[serde(default)]
    pub priority: Value,
    #[serde(default)]
    pub assignee_name: Value,
    #[serde(default)]
    pub assignee_id: Value,
    #[serde(default)]
    pub assignee_email: Value,
    #[serde(default)]
    pub created_at: Value,
    #[serde(default)]
    pub resolved_at: Value,
}

/// A nested issue carrying assignee and timestamp lists.
#[derive(Debug, Deserialize)]
pub struct RawIssue {
    #[serde(alias = "id", default)]
    pub issue_id: Value,
    #[serde(default)]
    pub issue_type: Value,
    #[serde(default)]
    pub status: Value,
    #[serde(default)]
    pub priority: Value,
    #[serde(default)]
    pub assignee: OneOrMany<RawAssignee>,
    #[serde(default)]
    pub timestamps: OneOrMany<RawTimestamps>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawAssignee {
    #[serde(default)]
    pub email: Value,
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub name: Value,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawTimestamps {
    #[serde(default)]
    pub created_at: Value,
    #[serde(default)]
    pub resolved_at: Value,
}

/// A list field that may also appear as a single object or null.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
    None(()),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::None(())
    }
}

impl<T: Clone + Default> OneOrMany<T> {
    /// Items to explode over; an empty list explodes to one absent item.
    pub fn exploded(&self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) if !items.is_empty() => items.clone(),
            OneOrMany::One(item) => vec![item.clone()],
            _ => vec![T::default()],
        }
    }
}

/// Text form of a scalar; `None` for null and empty strings.
pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Outcome of coercing a timestamp cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimestampCell {
    /// Parsed instant
    Parsed(Timestamp),
    /// Null or absent
    Missing,
    /// Present but not a valid instant
    Invalid,
}

impl TimestampCell {
    /// The parsed instant, if any.
    pub fn value(self) -> Option<Timestamp> {
        match self {
            TimestampCell::Parsed(ts) => Some(ts),
            _ => None,
        }
    }
}

/// Coerce an ISO-8601 string or epoch-millisecond number into an instant.
pub fn instant(value: &Value) -> TimestampCell {
    match value {
        Value::Null => TimestampCell::Missing,
        Value::String(s) if s.trim().is_empty() => TimestampCell::Missing,
        Value::String(s) => parse_instant(s).map_or(TimestampCell::Invalid, TimestampCell::Parsed),
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .map_or(TimestampCell::Invalid, TimestampCell::Parsed),
        _ => TimestampCell::Invalid,
    }
}
