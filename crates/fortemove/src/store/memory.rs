//! In-memory store implementations backed by `Mutex<BTreeMap>`.
//!
//! Ids are zero-padded per-store sequences, so iteration order over the
//! map is insertion order.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use crate::domain::{
    Application, ApplicationId, ApplicationStatus, FormId, Job, JobId, JobPatch, NewApplication,
    NewJob, NewQuestionnaire, NewTalent, NewUser, Questionnaire, Role, Talent, User, UserId,
};

use super::{ApplicationStore, FormStore, JobStore, StoreError, UserStore};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))
}

fn require(value: &str, field: &'static str, message: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::validation(field, message));
    }
    Ok(())
}

#[derive(Default)]
pub struct MemoryJobStore {
    records: Mutex<BTreeMap<JobId, Job>>,
    sequence: AtomicU64,
}

impl MemoryJobStore {
    fn next_id(&self) -> JobId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        JobId(format!("job-{id:06}"))
    }
}

impl JobStore for MemoryJobStore {
    fn insert(&self, new: NewJob) -> Result<Job, StoreError> {
        require(&new.title, "title", "Job title is required")?;
        require(&new.company, "company", "Company name is required")?;
        require(&new.location, "location", "Job location is required")?;
        if new.salary_visible && new.salary.is_none() {
            return Err(StoreError::validation(
                "salary",
                "Salary is required when it is visible",
            ));
        }

        let job = Job {
            id: self.next_id(),
            title: new.title,
            company: new.company,
            description: new.description,
            requirements: new.requirements,
            location: new.location,
            salary_visible: new.salary_visible,
            salary: new.salary,
            active: true,
            created_at: Utc::now(),
            image_cover: new.image_cover,
            images: new.images,
        };

        let mut guard = lock(&self.records)?;
        guard.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn get(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        Ok(lock(&self.records)?.get(id).cloned())
    }

    fn update(&self, id: &JobId, patch: JobPatch) -> Result<Job, StoreError> {
        let mut guard = lock(&self.records)?;
        let job = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        job.apply_patch(patch);
        if job.salary_visible && job.salary.is_none() {
            return Err(StoreError::validation(
                "salary",
                "Salary is required when it is visible",
            ));
        }
        Ok(job.clone())
    }

    fn deactivate(&self, id: &JobId) -> Result<Job, StoreError> {
        let mut guard = lock(&self.records)?;
        let job = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        job.active = false;
        Ok(job.clone())
    }

    fn find_by_title(&self, title: &str) -> Result<Option<Job>, StoreError> {
        Ok(lock(&self.records)?
            .values()
            .find(|job| job.title == title)
            .cloned())
    }

    fn all(&self) -> Result<Vec<Job>, StoreError> {
        Ok(lock(&self.records)?.values().cloned().collect())
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(lock(&self.records)?.len())
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    records: Mutex<BTreeMap<UserId, User>>,
    sequence: AtomicU64,
}

impl MemoryUserStore {
    fn next_id(&self) -> UserId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        UserId(format!("user-{id:06}"))
    }
}

impl UserStore for MemoryUserStore {
    fn insert(&self, new: NewUser) -> Result<User, StoreError> {
        require(&new.name, "name", "Please provide your name")?;
        require(&new.email, "email", "Please provide your email")?;
        if !new.email.contains('@') {
            return Err(StoreError::validation(
                "email",
                "Please provide a valid email",
            ));
        }

        let email = new.email.trim().to_ascii_lowercase();
        let mut guard = lock(&self.records)?;
        if guard.values().any(|user| user.email == email) {
            return Err(StoreError::Conflict(format!(
                "a user with email {email} already exists"
            )));
        }

        let user = User {
            id: self.next_id(),
            name: new.name,
            email,
            phone: new.phone,
            password_hash: new.password_hash,
            role: new.role,
            google_id: new.google_id,
        };
        guard.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    fn get(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        Ok(lock(&self.records)?.get(id).cloned())
    }

    fn update_role(&self, id: &UserId, role: Role) -> Result<User, StoreError> {
        let mut guard = lock(&self.records)?;
        let user = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        user.role = role;
        Ok(user.clone())
    }

    fn delete(&self, id: &UserId) -> Result<(), StoreError> {
        let mut guard = lock(&self.records)?;
        guard.remove(id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = email.trim().to_ascii_lowercase();
        Ok(lock(&self.records)?
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    fn all(&self) -> Result<Vec<User>, StoreError> {
        Ok(lock(&self.records)?.values().cloned().collect())
    }
}

#[derive(Default)]
pub struct MemoryApplicationStore {
    records: Mutex<BTreeMap<ApplicationId, Application>>,
    sequence: AtomicU64,
}

impl MemoryApplicationStore {
    fn next_id(&self) -> ApplicationId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        ApplicationId(format!("app-{id:06}"))
    }
}

impl ApplicationStore for MemoryApplicationStore {
    fn insert(&self, new: NewApplication) -> Result<Application, StoreError> {
        require(&new.name, "name", "Please provide your name")?;
        require(&new.email, "email", "Please provide your email")?;
        if !new.email.contains('@') {
            return Err(StoreError::validation(
                "email",
                "Please provide a valid email",
            ));
        }

        let now = Utc::now();
        let application = Application {
            id: self.next_id(),
            job: new.job,
            user: new.user,
            name: new.name,
            email: new.email,
            phone: new.phone,
            cv_url: new.cv_url,
            cover_letter: new.cover_letter,
            status: new.status,
            applied_at: new.applied_at.unwrap_or(now),
            created_at: now,
            updated_at: now,
        };

        let mut guard = lock(&self.records)?;
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn get(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        Ok(lock(&self.records)?.get(id).cloned())
    }

    fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Application, StoreError> {
        let mut guard = lock(&self.records)?;
        let application = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        application.status = status;
        application.updated_at = Utc::now();
        Ok(application.clone())
    }

    fn delete(&self, id: &ApplicationId) -> Result<(), StoreError> {
        let mut guard = lock(&self.records)?;
        guard.remove(id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    fn find_existing(
        &self,
        job: &JobId,
        user: &UserId,
    ) -> Result<Option<Application>, StoreError> {
        Ok(lock(&self.records)?
            .values()
            .find(|application| &application.job == job && &application.user == user)
            .cloned())
    }

    fn all(&self) -> Result<Vec<Application>, StoreError> {
        Ok(lock(&self.records)?.values().cloned().collect())
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(lock(&self.records)?.len())
    }
}

#[derive(Default)]
pub struct MemoryFormStore {
    questionnaires: Mutex<BTreeMap<FormId, Questionnaire>>,
    talents: Mutex<BTreeMap<FormId, Talent>>,
    sequence: AtomicU64,
}

impl MemoryFormStore {
    fn next_id(&self, prefix: &str) -> FormId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        FormId(format!("{prefix}-{id:06}"))
    }
}

impl FormStore for MemoryFormStore {
    fn insert_questionnaire(&self, new: NewQuestionnaire) -> Result<Questionnaire, StoreError> {
        require(&new.email, "email", "Please provide your email")?;
        require(&new.name, "name", "Please provide your name")?;

        let email = new.email.trim().to_ascii_lowercase();
        let mut guard = lock(&self.questionnaires)?;
        if guard.values().any(|form| form.email == email) {
            return Err(StoreError::Conflict(format!(
                "a questionnaire for {email} already exists"
            )));
        }

        let form = Questionnaire {
            id: self.next_id("questionnaire"),
            email,
            name: new.name,
            title: new.title,
            phone: new.phone,
            company_size: new.company_size,
            company_type: new.company_type,
            company_industry: new.company_industry,
            company_location: new.company_location,
            position_needed: new.position_needed,
            years_of_experience: new.years_of_experience,
            work_model: new.work_model,
            employment_type: new.employment_type,
        };
        guard.insert(form.id.clone(), form.clone());
        Ok(form)
    }

    fn insert_talent(&self, new: NewTalent) -> Result<Talent, StoreError> {
        require(&new.email, "email", "Please provide your email")?;
        require(&new.cv_url, "cvUrl", "Please upload your CV")?;

        let email = new.email.trim().to_ascii_lowercase();
        let mut guard = lock(&self.talents)?;
        if guard.values().any(|form| form.email == email) {
            return Err(StoreError::Conflict(format!(
                "a talent profile for {email} already exists"
            )));
        }

        let form = Talent {
            id: self.next_id("talent"),
            email,
            name: new.name,
            phone: new.phone,
            profession: new.profession,
            experience: new.experience,
            cv_url: new.cv_url,
            created_at: Utc::now(),
        };
        guard.insert(form.id.clone(), form.clone());
        Ok(form)
    }

    fn questionnaires(&self) -> Result<Vec<Questionnaire>, StoreError> {
        Ok(lock(&self.questionnaires)?.values().cloned().collect())
    }

    fn talents(&self) -> Result<Vec<Talent>, StoreError> {
        Ok(lock(&self.talents)?.values().cloned().collect())
    }

    fn delete_questionnaire(&self, id: &FormId) -> Result<(), StoreError> {
        let mut guard = lock(&self.questionnaires)?;
        guard.remove(id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    fn delete_talent(&self, id: &FormId) -> Result<(), StoreError> {
        let mut guard = lock(&self.talents)?;
        guard.remove(id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}

/// Bundle wiring all in-memory stores together for the service binary and
/// the integration tests.
#[derive(Default, Clone)]
pub struct MemoryStores {
    pub jobs: Arc<MemoryJobStore>,
    pub users: Arc<MemoryUserStore>,
    pub applications: Arc<MemoryApplicationStore>,
    pub forms: Arc<MemoryFormStore>,
}
