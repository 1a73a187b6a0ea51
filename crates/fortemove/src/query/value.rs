use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{ApplicationView, Job, User};

/// Loosely-typed view of a record field, produced on demand so the query
/// plan can compare and search without knowing the record type.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(DateTime<Utc>),
    Bool(bool),
    Missing,
}

impl FieldValue {
    fn type_rank(&self) -> u8 {
        match self {
            FieldValue::Number(_) => 0,
            FieldValue::Date(_) => 1,
            FieldValue::Text(_) => 2,
            FieldValue::Bool(_) => 3,
            FieldValue::Missing => 4,
        }
    }

    /// Total order used for sorting; mismatched types fall back to a fixed
    /// type ranking with `Missing` greatest. The query plan pins missing
    /// values last before applying the key direction.
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    fn text(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }

    fn opt_text(value: Option<&str>) -> Self {
        match value {
            Some(text) => Self::text(text),
            None => FieldValue::Missing,
        }
    }
}

/// Records the query plan can filter, search, and sort.
pub trait Queryable {
    /// Value of the named field, or `Missing` when the record has none.
    /// Dotted names reach into related-entity snapshots.
    fn field(&self, name: &str) -> FieldValue;
}

/// Lenient timestamp parsing shared by the query builder and the import
/// engine: RFC 3339 or a bare `YYYY-MM-DD` calendar date.
pub fn parse_when(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    None
}

impl Queryable for ApplicationView {
    fn field(&self, name: &str) -> FieldValue {
        match name {
            "id" => FieldValue::text(&self.id.0),
            "name" => FieldValue::text(&self.name),
            "email" => FieldValue::text(&self.email),
            "phone" => FieldValue::opt_text(self.phone.as_deref()),
            "cvUrl" => FieldValue::opt_text(self.cv_url.as_deref()),
            "coverLetter" => FieldValue::text(&self.cover_letter),
            "status" => FieldValue::text(self.status.label()),
            "appliedAt" => FieldValue::Date(self.applied_at),
            "createdAt" => FieldValue::Date(self.created_at),
            "updatedAt" => FieldValue::Date(self.updated_at),
            "job" => match self.job_snapshot() {
                Some(snapshot) => FieldValue::text(&snapshot.id.0),
                None => match &self.job {
                    crate::domain::Populated::Ref(id) => FieldValue::text(&id.0),
                    crate::domain::Populated::Full(_) => FieldValue::Missing,
                },
            },
            "user" => FieldValue::text(&self.user_id().0),
            "job.title" => FieldValue::opt_text(self.job_snapshot().map(|j| j.title.as_str())),
            "job.company" => FieldValue::opt_text(self.job_snapshot().map(|j| j.company.as_str())),
            "job.location" => {
                FieldValue::opt_text(self.job_snapshot().map(|j| j.location.as_str()))
            }
            "job.salary" => match self.job_snapshot().and_then(|j| j.salary) {
                Some(salary) => FieldValue::Number(salary as f64),
                None => FieldValue::Missing,
            },
            "user.name" => FieldValue::opt_text(self.user_snapshot().map(|u| u.name.as_str())),
            "user.email" => FieldValue::opt_text(self.user_snapshot().map(|u| u.email.as_str())),
            "user.role" => FieldValue::opt_text(self.user_snapshot().map(|u| u.role.label())),
            _ => FieldValue::Missing,
        }
    }
}

impl Queryable for Job {
    fn field(&self, name: &str) -> FieldValue {
        match name {
            "id" => FieldValue::text(&self.id.0),
            "title" => FieldValue::text(&self.title),
            "company" => FieldValue::text(&self.company),
            "description" => FieldValue::text(&self.description),
            "requirements" => FieldValue::text(&self.requirements),
            "location" => FieldValue::text(&self.location),
            "salaryVisible" => FieldValue::Bool(self.salary_visible),
            "salary" => match self.salary {
                Some(salary) => FieldValue::Number(salary as f64),
                None => FieldValue::Missing,
            },
            "active" => FieldValue::Bool(self.active),
            "createdAt" => FieldValue::Date(self.created_at),
            _ => FieldValue::Missing,
        }
    }
}

impl Queryable for User {
    fn field(&self, name: &str) -> FieldValue {
        match name {
            "id" => FieldValue::text(&self.id.0),
            "name" => FieldValue::text(&self.name),
            "email" => FieldValue::text(&self.email),
            "phone" => FieldValue::opt_text(self.phone.as_deref()),
            "role" => FieldValue::text(self.role.label()),
            _ => FieldValue::Missing,
        }
    }
}
