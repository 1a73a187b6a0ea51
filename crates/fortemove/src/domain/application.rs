use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApplicationId, Job, JobId, Role, User, UserId};

/// Review state of an application. Only admins move it past `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Rejected,
    Accepted,
}

impl ApplicationStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "reviewed" => Some(Self::Reviewed),
            "rejected" => Some(Self::Rejected),
            "accepted" => Some(Self::Accepted),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Accepted => "accepted",
        }
    }
}

impl Default for ApplicationStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// A persisted application. Job and user are plain id references owned by
/// their own stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub job: JobId,
    pub user: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cv_url: Option<String>,
    pub cover_letter: String,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for persisting an application, from the apply endpoint or a
/// reconciled import row.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub job: JobId,
    pub user: UserId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub cv_url: Option<String>,
    pub cover_letter: String,
    pub status: ApplicationStatus,
    pub applied_at: Option<DateTime<Utc>>,
}

/// Snapshot of the job fields exposed on populated application views.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSnapshot {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<i64>,
}

impl From<&Job> for JobSnapshot {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id.clone(),
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            salary: job.salary_visible.then_some(job.salary).flatten(),
        }
    }
}

/// Snapshot of the user fields exposed on populated application views.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSnapshot {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
}

impl From<&User> for UserSnapshot {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            role: user.role,
        }
    }
}

/// A reference that may have been resolved to its full record. Serializes
/// as the populated snapshot when available, otherwise as the bare id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Populated<T, I> {
    Full(T),
    Ref(I),
}

/// An application joined with its referenced job and user. List endpoints
/// and the export formatter work on this populated form so text search can
/// reach related-entity fields in a single pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    pub id: ApplicationId,
    pub job: Populated<JobSnapshot, JobId>,
    pub user: Populated<UserSnapshot, UserId>,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cv_url: Option<String>,
    pub cover_letter: String,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicationView {
    pub fn new(application: Application, job: Option<&Job>, user: Option<&User>) -> Self {
        let job = match job {
            Some(job) => Populated::Full(JobSnapshot::from(job)),
            None => Populated::Ref(application.job.clone()),
        };
        let user = match user {
            Some(user) => Populated::Full(UserSnapshot::from(user)),
            None => Populated::Ref(application.user.clone()),
        };
        Self {
            id: application.id,
            job,
            user,
            name: application.name,
            email: application.email,
            phone: application.phone,
            cv_url: application.cv_url,
            cover_letter: application.cover_letter,
            status: application.status,
            applied_at: application.applied_at,
            created_at: application.created_at,
            updated_at: application.updated_at,
        }
    }

    pub fn job_snapshot(&self) -> Option<&JobSnapshot> {
        match &self.job {
            Populated::Full(snapshot) => Some(snapshot),
            Populated::Ref(_) => None,
        }
    }

    pub fn user_snapshot(&self) -> Option<&UserSnapshot> {
        match &self.user {
            Populated::Full(snapshot) => Some(snapshot),
            Populated::Ref(_) => None,
        }
    }

    pub fn user_id(&self) -> &UserId {
        match &self.user {
            Populated::Full(snapshot) => &snapshot.id,
            Populated::Ref(id) => id,
        }
    }
}
