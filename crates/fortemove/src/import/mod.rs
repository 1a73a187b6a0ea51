//! Bulk import: reconcile spreadsheet rows against existing jobs and
//! users, creating what is missing, and persist one application per row.
//!
//! Rows are processed independently. A failed row is recorded with its
//! 1-based spreadsheet position (header included, so data row 1 reports as
//! row 2) and never aborts the batch or rolls back committed rows. A job
//! or user created before the row's application failed stays behind; the
//! row is not a transactional unit.

mod parser;

use std::io::Read;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::{Application, ApplicationStatus, NewApplication, NewJob, NewUser};
use crate::query::parse_when;
use crate::store::{ApplicationStore, JobStore, StoreError, UserStore};

pub use parser::ImportRow;

/// Whole-batch failures. Per-row problems, malformed CSV records
/// included, are data, not errors.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("dataset has {count} rows, exceeding the {max} row limit")]
    TooManyRows { count: usize, max: usize },
}

/// One failed row: spreadsheet position, message, and the raw row echoed
/// back so the caller can fix and resubmit it.
#[derive(Debug, Clone, Serialize)]
pub struct RowFailure {
    pub row: usize,
    pub error: String,
    pub data: ImportRow,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub imported_count: usize,
    pub error_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<RowFailure>,
}

pub struct ImportEngine {
    jobs: Arc<dyn JobStore>,
    users: Arc<dyn UserStore>,
    applications: Arc<dyn ApplicationStore>,
    max_rows: usize,
}

impl ImportEngine {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        users: Arc<dyn UserStore>,
        applications: Arc<dyn ApplicationStore>,
        max_rows: usize,
    ) -> Self {
        Self {
            jobs,
            users,
            applications,
            max_rows,
        }
    }

    pub fn import<R: Read>(&self, reader: R) -> Result<ImportSummary, ImportError> {
        let rows = parser::parse_rows(reader);
        if rows.len() > self.max_rows {
            return Err(ImportError::TooManyRows {
                count: rows.len(),
                max: self.max_rows,
            });
        }

        let mut imported_count = 0;
        let mut errors = Vec::new();

        for (index, row) in rows.iter().enumerate() {
            // +2: spreadsheet rows are 1-based and row 1 is the header.
            let position = index + 2;
            let outcome = match row {
                Ok(row) => self.import_row(row).map_err(|err| (err.to_string(), row.clone())),
                Err(err) => Err((format!("unreadable CSV row: {err}"), ImportRow::default())),
            };
            match outcome {
                Ok(_) => imported_count += 1,
                Err((error, data)) => {
                    warn!(row = position, %error, "import row failed");
                    errors.push(RowFailure {
                        row: position,
                        error,
                        data,
                    });
                }
            }
        }

        info!(
            imported = imported_count,
            failed = errors.len(),
            "application import finished"
        );

        Ok(ImportSummary {
            imported_count,
            error_count: errors.len(),
            errors,
        })
    }

    fn import_row(&self, row: &ImportRow) -> Result<Application, StoreError> {
        // Lookups run per row, never cached, so duplicate titles/emails
        // within one file resolve to a single created entity.
        let job = match &row.job_title {
            Some(title) => match self.jobs.find_by_title(title)? {
                Some(job) => Some(job),
                None => Some(self.jobs.insert(NewJob {
                    title: title.clone(),
                    company: row
                        .company
                        .clone()
                        .unwrap_or_else(|| "Unknown Company".to_string()),
                    location: row.location.clone().unwrap_or_else(|| "Remote".to_string()),
                    description: row.job_description.clone().unwrap_or_default(),
                    requirements: row.job_requirements.clone().unwrap_or_default(),
                    ..NewJob::default()
                })?),
            },
            None => None,
        };

        let user = match &row.email {
            Some(email) => match self.users.find_by_email(email)? {
                Some(user) => Some(user),
                None => Some(self.users.insert(NewUser::import_placeholder(
                    row.name.as_deref(),
                    email,
                    row.phone.as_deref(),
                ))?),
            },
            None => None,
        };

        let job = job
            .map(|job| job.id)
            .ok_or_else(|| StoreError::validation("job", "Application must be for a job"))?;
        let user = user
            .map(|user| user.id)
            .ok_or_else(|| StoreError::validation("user", "Application must belong to a user"))?;

        let status = match &row.status {
            Some(raw) => ApplicationStatus::parse(raw)
                .ok_or_else(|| StoreError::validation("status", format!("invalid status '{raw}'")))?,
            None => ApplicationStatus::Pending,
        };

        let applied_at = match &row.applied_at {
            Some(raw) => Some(parse_when(raw).ok_or_else(|| {
                StoreError::validation("appliedAt", format!("'{raw}' is not a valid date"))
            })?),
            None => None,
        };

        self.applications.insert(NewApplication {
            job,
            user,
            name: row
                .name
                .clone()
                .ok_or_else(|| StoreError::validation("name", "Please provide your name"))?,
            email: row
                .email
                .clone()
                .ok_or_else(|| StoreError::validation("email", "Please provide your email"))?,
            phone: row.phone.clone(),
            cv_url: None,
            cover_letter: row.cover_letter.clone().unwrap_or_default(),
            status,
            applied_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStores;
    use std::io::Cursor;

    fn engine(stores: &MemoryStores) -> ImportEngine {
        ImportEngine::new(
            stores.jobs.clone(),
            stores.users.clone(),
            stores.applications.clone(),
            100,
        )
    }

    const HEADER: &str =
        "jobTitle,company,location,jobDescription,jobRequirements,email,name,phone,coverLetter,status,appliedAt\n";

    #[test]
    fn creates_missing_job_with_defaults() {
        let stores = MemoryStores::default();
        let csv = format!("{HEADER}New Role,,,,,jane@example.com,Jane,,,pending,2024-01-02\n");
        let summary = engine(&stores).import(Cursor::new(csv)).expect("imports");
        assert_eq!(summary.imported_count, 1);

        let job = stores
            .jobs
            .find_by_title("New Role")
            .expect("lookup")
            .expect("created");
        assert_eq!(job.company, "Unknown Company");
        assert_eq!(job.location, "Remote");
        assert_eq!(job.description, "");
    }

    #[test]
    fn row_without_job_title_fails_without_aborting() {
        let stores = MemoryStores::default();
        let csv = format!(
            "{HEADER},,,,,missing-job@example.com,Max,,,pending,\n\
Role,,,,,ok@example.com,Olive,,,pending,\n"
        );
        let summary = engine(&stores).import(Cursor::new(csv)).expect("imports");
        assert_eq!(summary.imported_count, 1);
        assert_eq!(summary.error_count, 1);
        assert_eq!(summary.errors[0].row, 2);
        assert!(summary.errors[0].error.contains("job"));
    }

    #[test]
    fn invalid_status_is_a_row_failure() {
        let stores = MemoryStores::default();
        let csv = format!("{HEADER}Role,,,,,jane@example.com,Jane,,,archived,\n");
        let summary = engine(&stores).import(Cursor::new(csv)).expect("imports");
        assert_eq!(summary.imported_count, 0);
        assert_eq!(summary.errors[0].row, 2);
        assert!(summary.errors[0].error.contains("archived"));
    }

    #[test]
    fn unreadable_row_is_a_row_failure_not_a_batch_failure() {
        let stores = MemoryStores::default();
        let csv = format!(
            "{HEADER}Role,,,,,jane@example.com,Jane,,,pending,,,stray,cells\n\
Role,,,,,sam@example.com,Sam,,,pending,\n"
        );
        let summary = engine(&stores).import(Cursor::new(csv)).expect("imports");
        assert_eq!(summary.imported_count, 1);
        assert_eq!(summary.error_count, 1);
        assert_eq!(summary.errors[0].row, 2);
        assert!(summary.errors[0].error.contains("unreadable CSV row"));
    }

    #[test]
    fn row_ceiling_rejects_oversized_batches() {
        let stores = MemoryStores::default();
        let mut csv = HEADER.to_string();
        for i in 0..3 {
            csv.push_str(&format!("Role,,,,,u{i}@example.com,U{i},,,,\n"));
        }
        let engine = ImportEngine::new(
            stores.jobs.clone(),
            stores.users.clone(),
            stores.applications.clone(),
            2,
        );
        let err = engine.import(Cursor::new(csv)).expect_err("over limit");
        assert!(matches!(err, ImportError::TooManyRows { count: 3, max: 2 }));
    }
}
