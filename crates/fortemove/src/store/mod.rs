//! Abstract persistence for the platform's entities.
//!
//! Stores own all entity state; every other component works with ids and
//! the snapshots returned here. The in-memory implementations in
//! [`memory`] back the service binary and the test suites.

pub mod memory;

use crate::domain::{
    Application, ApplicationId, FormId, Job, JobId, JobPatch, NewApplication, NewJob,
    NewQuestionnaire, NewTalent, NewUser, Questionnaire, Role, Talent, User, UserId,
};
use crate::domain::ApplicationStatus;

/// Failures surfaced by a record store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{message}")]
    Validation { field: &'static str, message: String },
    #[error("record not found")]
    NotFound,
    #[error("{0}")]
    Conflict(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

pub trait JobStore: Send + Sync {
    fn insert(&self, new: NewJob) -> Result<Job, StoreError>;
    fn get(&self, id: &JobId) -> Result<Option<Job>, StoreError>;
    fn update(&self, id: &JobId, patch: JobPatch) -> Result<Job, StoreError>;
    /// Soft delete: clears `active`, keeps the record.
    fn deactivate(&self, id: &JobId) -> Result<Job, StoreError>;
    fn find_by_title(&self, title: &str) -> Result<Option<Job>, StoreError>;
    fn all(&self) -> Result<Vec<Job>, StoreError>;
    fn count(&self) -> Result<usize, StoreError>;
}

pub trait UserStore: Send + Sync {
    fn insert(&self, new: NewUser) -> Result<User, StoreError>;
    fn get(&self, id: &UserId) -> Result<Option<User>, StoreError>;
    fn update_role(&self, id: &UserId, role: Role) -> Result<User, StoreError>;
    fn delete(&self, id: &UserId) -> Result<(), StoreError>;
    fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    fn all(&self) -> Result<Vec<User>, StoreError>;
}

pub trait ApplicationStore: Send + Sync {
    fn insert(&self, new: NewApplication) -> Result<Application, StoreError>;
    fn get(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError>;
    fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Application, StoreError>;
    fn delete(&self, id: &ApplicationId) -> Result<(), StoreError>;
    /// Duplicate pre-check for the (job, user) pair. Read-then-write; two
    /// concurrent identical applies can still both pass (accepted race).
    fn find_existing(&self, job: &JobId, user: &UserId)
        -> Result<Option<Application>, StoreError>;
    fn all(&self) -> Result<Vec<Application>, StoreError>;
    fn count(&self) -> Result<usize, StoreError>;
}

pub trait FormStore: Send + Sync {
    fn insert_questionnaire(&self, new: NewQuestionnaire) -> Result<Questionnaire, StoreError>;
    fn insert_talent(&self, new: NewTalent) -> Result<Talent, StoreError>;
    fn questionnaires(&self) -> Result<Vec<Questionnaire>, StoreError>;
    fn talents(&self) -> Result<Vec<Talent>, StoreError>;
    fn delete_questionnaire(&self, id: &FormId) -> Result<(), StoreError>;
    fn delete_talent(&self, id: &FormId) -> Result<(), StoreError>;
}

/// Resolves application references against the job and user stores,
/// mirroring a populate/join at the persistence boundary.
pub fn populate_applications(
    applications: Vec<Application>,
    jobs: &dyn JobStore,
    users: &dyn UserStore,
) -> Result<Vec<crate::domain::ApplicationView>, StoreError> {
    applications
        .into_iter()
        .map(|application| {
            let job = jobs.get(&application.job)?;
            let user = users.get(&application.user)?;
            Ok(crate::domain::ApplicationView::new(
                application,
                job.as_ref(),
                user.as_ref(),
            ))
        })
        .collect()
}

/// Convenience used by handlers that only need a single populated record.
pub fn populate_application(
    application: Application,
    jobs: &dyn JobStore,
    users: &dyn UserStore,
) -> Result<crate::domain::ApplicationView, StoreError> {
    let mut views = populate_applications(vec![application], jobs, users)?;
    match views.pop() {
        Some(view) => Ok(view),
        None => Err(StoreError::NotFound),
    }
}
