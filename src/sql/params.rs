//! Convert caller-supplied filter and update values into types sqlx can bind.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use sqlx::{Postgres, QueryBuilder};

use crate::error::CatalogError;
use crate::sql::columns::{ColumnKind, ColumnSpec};

/// A value bound to a PostgreSQL query, typed after its target column.
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    Text(String),
    Int(i32),
    Timestamp(DateTime<Utc>),
}

impl BindValue {
    /// Parse raw text (query strings, filter descriptors) for `spec`'s column type.
    pub fn parse(spec: &ColumnSpec, raw: &str) -> Result<Self, CatalogError> {
        match spec.kind {
            ColumnKind::Text => Ok(BindValue::Text(raw.to_string())),
            ColumnKind::Integer => raw
                .trim()
                .parse::<i32>()
                .map(BindValue::Int)
                .map_err(|_| invalid(spec, raw)),
            ColumnKind::Timestamp => parse_timestamp(raw.trim())
                .map(BindValue::Timestamp)
                .ok_or_else(|| invalid(spec, raw)),
        }
    }

    pub fn from_json(spec: &ColumnSpec, v: &Value) -> Result<Self, CatalogError> {
        match (spec.kind, v) {
            (_, Value::String(s)) => Self::parse(spec, s),
            (ColumnKind::Integer, Value::Number(n)) => n
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .map(BindValue::Int)
                .ok_or_else(|| invalid(spec, &n.to_string())),
            (ColumnKind::Text, Value::Number(n)) => Ok(BindValue::Text(n.to_string())),
            (_, other) => Err(invalid(spec, &other.to_string())),
        }
    }

    pub fn push_bind(self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            BindValue::Text(s) => qb.push_bind(s),
            BindValue::Int(n) => qb.push_bind(n),
            BindValue::Timestamp(t) => qb.push_bind(t),
        };
    }
}

fn invalid(spec: &ColumnSpec, raw: &str) -> CatalogError {
    CatalogError::Validation(format!("invalid value '{}' for column '{}'", raw, spec.key))
}

/// RFC 3339 timestamps or plain dates (midnight UTC).
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
