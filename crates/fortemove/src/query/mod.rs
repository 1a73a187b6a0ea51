//! Translates a flat query-parameter bag into a retrieval plan and runs it
//! over an in-memory candidate set: filter, free-text search, sort, field
//! projection, then the page window, in that order.

pub mod params;
pub mod value;

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;

pub use params::{CompareOp, FilterClause, FilterValue, ListParams, SortKey};
pub use value::{parse_when, FieldValue, Queryable};

/// Fields covered by the free-text `search` key. The dotted entries reach
/// related-entity snapshots on populated application views.
const SEARCH_FIELDS: [&str; 8] = [
    "name",
    "email",
    "coverLetter",
    "job.title",
    "job.location",
    "job.company",
    "user.name",
    "user.email",
];

const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: usize,
    pub size: usize,
}

impl PageWindow {
    fn skip(&self) -> usize {
        (self.number - 1) * self.size
    }
}

/// A fully-specified retrieval plan parsed from request parameters.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub filters: Vec<FilterClause>,
    pub search: Option<String>,
    pub sort: Vec<SortKey>,
    pub projection: Option<Vec<String>>,
    pub page: PageWindow,
}

impl QueryPlan {
    /// Parsing is fail-soft: malformed input degrades to defaults or to
    /// literal filters that simply match nothing.
    pub fn parse(params: &ListParams) -> Self {
        let filters = params
            .iter()
            .filter(|(key, _)| !params::RESERVED_KEYS.contains(key))
            .map(|(key, value)| FilterClause::parse(key, value))
            .collect();

        let search = params
            .get("search")
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_string);

        let sort = match params.get("sort") {
            Some(raw) => {
                let keys = SortKey::parse_list(raw);
                if keys.is_empty() {
                    default_sort()
                } else {
                    keys
                }
            }
            None => default_sort(),
        };

        let projection = params.get("fields").map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|field| !field.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        });

        let page = PageWindow {
            number: params::positive_or(params.get("page"), 1),
            size: params::positive_or(params.get("limit"), DEFAULT_PAGE_SIZE),
        };

        Self {
            filters,
            search,
            sort,
            projection,
            page,
        }
    }

    /// Run the plan over a candidate set, returning the requested page as
    /// JSON objects with the projection applied.
    pub fn execute<T>(&self, records: Vec<T>) -> Result<Vec<Value>, serde_json::Error>
    where
        T: Queryable + Serialize,
    {
        let mut rows: Vec<T> = records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect();

        rows.sort_by(|a, b| self.order(a, b));

        rows.iter()
            .skip(self.page.skip())
            .take(self.page.size)
            .map(|record| {
                let value = serde_json::to_value(record)?;
                Ok(self.project(value))
            })
            .collect()
    }

    /// Filter and search combine with logical AND.
    pub fn matches<T: Queryable>(&self, record: &T) -> bool {
        let filtered = self.filters.iter().all(|clause| clause_admits(clause, record));
        if !filtered {
            return false;
        }

        match &self.search {
            Some(term) => searches(term, record),
            None => true,
        }
    }

    fn order<T: Queryable>(&self, a: &T, b: &T) -> Ordering {
        for key in &self.sort {
            let left = a.field(&key.field);
            let right = b.field(&key.field);
            // Missing values stay last under either direction; the key
            // direction only reorders values that are present.
            let ordering = match (&left, &right) {
                (FieldValue::Missing, FieldValue::Missing) => Ordering::Equal,
                (FieldValue::Missing, _) => Ordering::Greater,
                (_, FieldValue::Missing) => Ordering::Less,
                _ if key.descending => left.sort_cmp(&right).reverse(),
                _ => left.sort_cmp(&right),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    fn project(&self, value: Value) -> Value {
        let Some(fields) = &self.projection else {
            return value;
        };
        let Value::Object(map) = value else {
            return value;
        };

        // The id survives projection, matching store behavior upstream.
        let projected = map
            .into_iter()
            .filter(|(key, _)| key == "id" || fields.iter().any(|field| field == key))
            .collect();
        Value::Object(projected)
    }
}

fn default_sort() -> Vec<SortKey> {
    vec![SortKey {
        field: "appliedAt".to_string(),
        descending: true,
    }]
}

fn clause_admits<T: Queryable>(clause: &FilterClause, record: &T) -> bool {
    let actual = record.field(&clause.field);
    match compare(&actual, &clause.value) {
        Some(ordering) => clause.op.admits(ordering),
        None => false,
    }
}

/// Compare a record field against a filter value with the documented
/// coercions. `None` means "incomparable", which never matches.
fn compare(actual: &FieldValue, expected: &FilterValue) -> Option<Ordering> {
    match (actual, expected) {
        (FieldValue::Date(a), FilterValue::Date(b)) => Some(a.cmp(b)),
        (FieldValue::Number(a), FilterValue::Number(b)) => Some(a.total_cmp(b)),
        (FieldValue::Text(a), FilterValue::Text(b)) => Some(a.as_str().cmp(b.as_str())),
        (FieldValue::Text(a), FilterValue::Number(b)) => {
            a.parse::<f64>().ok().map(|a| a.total_cmp(b))
        }
        (FieldValue::Number(a), FilterValue::Text(b)) => {
            b.parse::<f64>().ok().map(|b| a.total_cmp(&b))
        }
        (FieldValue::Bool(a), FilterValue::Text(b)) => match b.trim().parse::<bool>() {
            Ok(b) => Some(a.cmp(&b)),
            Err(_) => None,
        },
        _ => None,
    }
}

fn searches<T: Queryable>(term: &str, record: &T) -> bool {
    let needle = term.to_lowercase();
    SEARCH_FIELDS.iter().any(|field| {
        record
            .field(field)
            .as_text()
            .is_some_and(|text| text.to_lowercase().contains(&needle))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde::Serialize;

    #[derive(Debug, Clone, Serialize)]
    struct Row {
        id: String,
        name: String,
        email: String,
        status: String,
        #[serde(rename = "appliedAt")]
        applied_at: chrono::DateTime<Utc>,
        salary: Option<i64>,
    }

    impl Queryable for Row {
        fn field(&self, name: &str) -> FieldValue {
            match name {
                "id" => FieldValue::Text(self.id.clone()),
                "name" => FieldValue::Text(self.name.clone()),
                "email" => FieldValue::Text(self.email.clone()),
                "status" => FieldValue::Text(self.status.clone()),
                "appliedAt" => FieldValue::Date(self.applied_at),
                "salary" => match self.salary {
                    Some(salary) => FieldValue::Number(salary as f64),
                    None => FieldValue::Missing,
                },
                _ => FieldValue::Missing,
            }
        }
    }

    fn row(id: &str, name: &str, status: &str, day: u32, salary: Option<i64>) -> Row {
        Row {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{id}@example.com"),
            status: status.to_string(),
            applied_at: Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
            salary,
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            row("a", "Ada", "pending", 1, Some(100)),
            row("b", "Bo", "reviewed", 2, Some(200)),
            row("c", "Cal", "pending", 3, None),
            row("d", "Dot", "accepted", 4, Some(50)),
        ]
    }

    #[test]
    fn equality_and_range_filters_intersect() {
        let params = ListParams::new()
            .with("status", "pending")
            .with("appliedAt[gte]", "2024-03-02");
        let plan = QueryPlan::parse(&params);
        let result = plan.execute(rows()).expect("executes");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["id"], "c");
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let params = ListParams::new().with("search", "AD");
        let plan = QueryPlan::parse(&params);
        let result = plan.execute(rows()).expect("executes");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["name"], "Ada");
    }

    #[test]
    fn search_and_filters_combine_with_and() {
        let params = ListParams::new()
            .with("search", "example.com")
            .with("status", "reviewed");
        let plan = QueryPlan::parse(&params);
        let result = plan.execute(rows()).expect("executes");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["id"], "b");
    }

    #[test]
    fn default_sort_is_applied_at_descending() {
        let plan = QueryPlan::parse(&ListParams::new());
        let result = plan.execute(rows()).expect("executes");
        let ids: Vec<_> = result.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, ["d", "c", "b", "a"]);
    }

    #[test]
    fn multi_key_sort_breaks_ties_in_listed_order() {
        let params = ListParams::new().with("sort", "status,-appliedAt");
        let plan = QueryPlan::parse(&params);
        let result = plan.execute(rows()).expect("executes");
        let ids: Vec<_> = result.iter().map(|r| r["id"].as_str().unwrap()).collect();
        // accepted < pending < reviewed; pending ties resolved newest-first
        assert_eq!(ids, ["d", "c", "a", "b"]);
    }

    #[test]
    fn missing_values_sort_last_under_a_descending_key() {
        let params = ListParams::new().with("sort", "-salary");
        let plan = QueryPlan::parse(&params);
        let result = plan.execute(rows()).expect("executes");
        let ids: Vec<_> = result.iter().map(|r| r["id"].as_str().unwrap()).collect();
        // c has no salary and trails even though the key is descending.
        assert_eq!(ids, ["b", "a", "d", "c"]);
    }

    #[test]
    fn numeric_range_on_opaque_field() {
        let params = ListParams::new().with("salary[lt]", "150");
        let plan = QueryPlan::parse(&params);
        let result = plan.execute(rows()).expect("executes");
        let ids: Vec<_> = result.iter().map(|r| r["id"].as_str().unwrap()).collect();
        // Missing salary is incomparable and drops out.
        assert_eq!(ids, ["d", "a"]);
    }

    #[test]
    fn unknown_field_filter_matches_nothing() {
        let params = ListParams::new().with("department", "engineering");
        let plan = QueryPlan::parse(&params);
        assert!(plan.execute(rows()).expect("executes").is_empty());
    }

    #[test]
    fn projection_keeps_requested_fields_and_id() {
        let params = ListParams::new().with("fields", "name,status");
        let plan = QueryPlan::parse(&params);
        let result = plan.execute(rows()).expect("executes");
        let first = result[0].as_object().expect("object");
        assert_eq!(first.len(), 3);
        assert!(first.contains_key("id"));
        assert!(first.contains_key("name"));
        assert!(first.contains_key("status"));
    }

    #[test]
    fn pagination_windows_are_disjoint_and_exhaustive() {
        let all = QueryPlan::parse(&ListParams::new().with("limit", "100"))
            .execute(rows())
            .expect("executes");

        let mut paged = Vec::new();
        for page in 1..=2 {
            let params = ListParams::new()
                .with("limit", "2")
                .with("page", &page.to_string());
            paged.extend(QueryPlan::parse(&params).execute(rows()).expect("executes"));
        }
        assert_eq!(paged, all);
    }

    #[test]
    fn page_past_the_end_is_empty_not_an_error() {
        let params = ListParams::new().with("page", "9");
        let plan = QueryPlan::parse(&params);
        assert!(plan.execute(rows()).expect("executes").is_empty());
    }
}
