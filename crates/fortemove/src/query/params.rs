//! Grammar of the flat query-parameter bag consumed by list endpoints.
//!
//! Reserved keys: `fields`, `limit`, `page`, `sort`, `search`. Every other
//! key is a filter: either a plain equality key (`status=pending`) or a
//! bracketed range key (`appliedAt[gte]=2024-01-01`). A bracketed key
//! whose operator is not one of `gte`/`gt`/`lte`/`lt` degrades to a
//! literal equality key.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::value::parse_when;

/// Fields whose filter values must be compared as calendar timestamps,
/// never as strings.
const DATE_FIELDS: [&str; 5] = ["appliedAt", "createdAt", "updatedAt", "date", "timestamp"];

pub(crate) const RESERVED_KEYS: [&str; 5] = ["fields", "limit", "page", "sort", "search"];

pub fn is_date_field(name: &str) -> bool {
    DATE_FIELDS.contains(&name)
}

/// Raw query-string pairs, order-independent.
#[derive(Debug, Clone, Default)]
pub struct ListParams(BTreeMap<String, String>);

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.0.insert(key.to_string(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<BTreeMap<String, String>> for ListParams {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, String)> for ListParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Gte,
    Gt,
    Lte,
    Lt,
}

impl CompareOp {
    pub fn parse(op: &str) -> Option<Self> {
        match op {
            "gte" => Some(Self::Gte),
            "gt" => Some(Self::Gt),
            "lte" => Some(Self::Lte),
            "lt" => Some(Self::Lt),
            _ => None,
        }
    }

    pub fn admits(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Gte => ordering != Ordering::Less,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Lte => ordering != Ordering::Greater,
            CompareOp::Lt => ordering == Ordering::Less,
        }
    }
}

/// A filter value, typed at parse time from the field name and raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Date(DateTime<Utc>),
    Number(f64),
    Text(String),
    /// A date-typed field received an unparseable value; the clause can
    /// never match.
    Unsatisfiable,
}

impl FilterValue {
    pub fn typed(field: &str, raw: &str) -> Self {
        if is_date_field(field) {
            return match parse_when(raw) {
                Some(when) => Self::Date(when),
                None => Self::Unsatisfiable,
            };
        }
        match raw.parse::<f64>() {
            Ok(number) => Self::Number(number),
            Err(_) => Self::Text(raw.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    pub field: String,
    pub op: CompareOp,
    pub value: FilterValue,
}

impl FilterClause {
    /// Parse one non-reserved query pair into a clause.
    pub fn parse(key: &str, raw: &str) -> Self {
        if let Some((field, rest)) = key.split_once('[') {
            if let Some(op_name) = rest.strip_suffix(']') {
                if let Some(op) = CompareOp::parse(op_name) {
                    return Self {
                        field: field.to_string(),
                        op,
                        value: FilterValue::typed(field, raw),
                    };
                }
            }
        }

        // Unknown operator or stray bracket: the whole key becomes a
        // literal equality filter (fail-soft).
        Self {
            field: key.to_string(),
            op: CompareOp::Eq,
            value: FilterValue::typed(key, raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub descending: bool,
}

impl SortKey {
    pub fn parse_list(raw: &str) -> Vec<Self> {
        raw.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty() && *part != "-")
            .map(|part| match part.strip_prefix('-') {
                Some(field) => Self {
                    field: field.to_string(),
                    descending: true,
                },
                None => Self {
                    field: part.to_string(),
                    descending: false,
                },
            })
            .collect()
    }
}

/// Positive-integer coercion for `page`/`limit`; anything else falls back.
pub(crate) fn positive_or(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}
