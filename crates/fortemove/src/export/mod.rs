//! Flattens filtered, populated applications into a downloadable table or
//! JSON array, plus the one-row import template.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{Application, ApplicationStatus, ApplicationView};
use crate::query::parse_when;
use crate::store::{populate_applications, ApplicationStore, JobStore, StoreError, UserStore};

/// `excel` is the historical wire name for the tabular download; the
/// document itself is CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Excel,
    Json,
}

impl Default for ExportFormat {
    fn default() -> Self {
        Self::Excel
    }
}

/// Filter parameters accepted by the export endpoint. `"all"` is a
/// sentinel meaning "no filter" for job and status.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportQuery {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
    #[serde(default)]
    pub format: ExportFormat,
}

/// One exported application, flattened with its job and user fields.
#[derive(Debug, Clone, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Application ID")]
    pub application_id: String,
    #[serde(rename = "Applicant Name")]
    pub applicant_name: String,
    #[serde(rename = "Applicant Email")]
    pub applicant_email: String,
    #[serde(rename = "Applicant Phone")]
    pub applicant_phone: String,
    #[serde(rename = "Job Title")]
    pub job_title: String,
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Cover Letter")]
    pub cover_letter: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Applied Date")]
    pub applied_date: String,
    #[serde(rename = "Last Updated")]
    pub last_updated: String,
    #[serde(rename = "CV URL")]
    pub cv_url: String,
}

const PLACEHOLDER: &str = "N/A";

impl From<&ApplicationView> for ExportRow {
    fn from(view: &ApplicationView) -> Self {
        let job = view.job_snapshot();
        let user = view.user_snapshot();
        Self {
            application_id: view.id.0.clone(),
            applicant_name: view.name.clone(),
            applicant_email: view.email.clone(),
            applicant_phone: view
                .phone
                .clone()
                .or_else(|| user.and_then(|u| u.phone.clone()))
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            job_title: job.map_or_else(|| PLACEHOLDER.to_string(), |j| j.title.clone()),
            company: job.map_or_else(|| PLACEHOLDER.to_string(), |j| j.company.clone()),
            location: job.map_or_else(|| PLACEHOLDER.to_string(), |j| j.location.clone()),
            cover_letter: view.cover_letter.clone(),
            status: view.status.label().to_string(),
            applied_date: view.applied_at.format("%Y-%m-%d").to_string(),
            last_updated: view.updated_at.format("%Y-%m-%d").to_string(),
            cv_url: view
                .cv_url
                .clone()
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ExportOutput {
    Csv(String),
    Json(Vec<ExportRow>),
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to render export: {0}")]
    Render(String),
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        Self::Render(err.to_string())
    }
}

pub struct ExportEngine {
    jobs: Arc<dyn JobStore>,
    users: Arc<dyn UserStore>,
    applications: Arc<dyn ApplicationStore>,
}

impl ExportEngine {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        users: Arc<dyn UserStore>,
        applications: Arc<dyn ApplicationStore>,
    ) -> Self {
        Self {
            jobs,
            users,
            applications,
        }
    }

    pub fn export(&self, query: &ExportQuery) -> Result<ExportOutput, ExportError> {
        let mut applications: Vec<Application> = self
            .applications
            .all()?
            .into_iter()
            .filter(|application| Self::admits(application, query))
            .collect();
        applications.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));

        let views = populate_applications(applications, &*self.jobs, &*self.users)?;
        let rows: Vec<ExportRow> = views.iter().map(ExportRow::from).collect();

        match query.format {
            ExportFormat::Json => Ok(ExportOutput::Json(rows)),
            ExportFormat::Excel => Ok(ExportOutput::Csv(render_csv(&rows)?)),
        }
    }

    fn admits(application: &Application, query: &ExportQuery) -> bool {
        if let Some(job_id) = active_filter(&query.job_id) {
            if application.job.0 != job_id {
                return false;
            }
        }
        if let Some(status) = active_filter(&query.status) {
            match ApplicationStatus::parse(status) {
                Some(status) if application.status == status => {}
                _ => return false,
            }
        }
        if let Some(from) = parse_bound(&query.date_from, "dateFrom") {
            if application.applied_at < from {
                return false;
            }
        }
        if let Some(to) = parse_bound(&query.date_to, "dateTo") {
            if application.applied_at > to {
                return false;
            }
        }
        true
    }
}

fn active_filter(raw: &Option<String>) -> Option<&str> {
    raw.as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty() && *value != "all")
}

fn parse_bound(raw: &Option<String>, name: &str) -> Option<DateTime<Utc>> {
    let raw = raw.as_deref()?.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = parse_when(raw);
    if parsed.is_none() {
        warn!(parameter = name, value = raw, "ignoring unparseable export date bound");
    }
    parsed
}

fn render_csv<S: Serialize>(rows: &[S]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Render(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| ExportError::Render(err.to_string()))
}

/// Example row guiding correct import formatting; shares the import
/// engine's column header set.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateRow {
    #[serde(rename = "jobTitle")]
    pub job_title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "jobDescription")]
    pub job_description: String,
    #[serde(rename = "jobRequirements")]
    pub job_requirements: String,
    pub email: String,
    pub name: String,
    pub phone: String,
    #[serde(rename = "coverLetter")]
    pub cover_letter: String,
    pub status: String,
    #[serde(rename = "appliedAt")]
    pub applied_at: String,
}

pub fn import_template_csv() -> Result<String, ExportError> {
    let example = TemplateRow {
        job_title: "Software Developer".to_string(),
        company: "Tech Corp".to_string(),
        location: "Remote".to_string(),
        job_description: "Build and ship product features".to_string(),
        job_requirements: "3+ years of backend experience".to_string(),
        email: "john@example.com".to_string(),
        name: "John Doe".to_string(),
        phone: "+1234567890".to_string(),
        cover_letter: "I am excited to apply for this position...".to_string(),
        status: "pending".to_string(),
        applied_at: "2023-01-15".to_string(),
    };
    render_csv(&[example])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_sentinel_disables_a_filter() {
        assert_eq!(active_filter(&Some("all".to_string())), None);
        assert_eq!(active_filter(&Some("  ".to_string())), None);
        assert_eq!(
            active_filter(&Some("pending".to_string())),
            Some("pending")
        );
        assert_eq!(active_filter(&None), None);
    }

    #[test]
    fn template_has_import_header_and_one_row() {
        let csv = import_template_csv().expect("renders");
        let mut lines = csv.lines();
        let header = lines.next().expect("header");
        assert!(header.starts_with("jobTitle,company,location"));
        assert!(header.contains("appliedAt"));
        assert_eq!(lines.count(), 1);
    }

    #[test]
    fn export_format_defaults_to_excel() {
        let query: ExportQuery = serde_json::from_str("{}").expect("parses");
        assert_eq!(query.format, ExportFormat::Excel);
    }
}
