use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::access::{ensure_admin, ensure_candidate, Principal};
use crate::domain::{
    Application, ApplicationStatus, Job, JobId, JobPatch, NewApplication, NewJob,
};
use crate::query::{ListParams, QueryPlan, SortKey};
use crate::store::{ApplicationStore, JobStore};

use super::{FileCleanup, ServiceError};

/// Candidate apply payload. The CV has already been written to storage by
/// the upload middleware; we hold its path and clean it up if the
/// application is rejected or fails to persist.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub cover_letter: String,
    pub cv_url: String,
}

pub struct JobService {
    jobs: Arc<dyn JobStore>,
    applications: Arc<dyn ApplicationStore>,
    files: Arc<dyn FileCleanup>,
}

impl JobService {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        applications: Arc<dyn ApplicationStore>,
        files: Arc<dyn FileCleanup>,
    ) -> Self {
        Self {
            jobs,
            applications,
            files,
        }
    }

    /// Active jobs through the query pipeline. Zero matches is a success
    /// with an empty page, consistent with every other list endpoint.
    pub fn list_active(&self, params: &ListParams) -> Result<Vec<Value>, ServiceError> {
        let mut plan = QueryPlan::parse(params);
        if params.get("sort").is_none() {
            plan.sort = vec![SortKey {
                field: "createdAt".to_string(),
                descending: true,
            }];
        }

        let jobs: Vec<Job> = self
            .jobs
            .all()?
            .into_iter()
            .filter(|job| job.active)
            .collect();
        Ok(plan.execute(jobs)?)
    }

    pub fn get(&self, id: &JobId) -> Result<Job, ServiceError> {
        self.jobs
            .get(id)?
            .ok_or(ServiceError::NotFound("Job not found"))
    }

    pub fn create(&self, principal: &Principal, new: NewJob) -> Result<Job, ServiceError> {
        ensure_admin(principal)?;
        Ok(self.jobs.insert(new)?)
    }

    pub fn update(
        &self,
        principal: &Principal,
        id: &JobId,
        patch: JobPatch,
    ) -> Result<Job, ServiceError> {
        ensure_admin(principal)?;
        self.jobs.update(id, patch).map_err(|err| match err {
            crate::store::StoreError::NotFound => ServiceError::NotFound("Job not found"),
            other => other.into(),
        })
    }

    /// Soft delete: the job stays in the store with `active` cleared.
    pub fn delete(&self, principal: &Principal, id: &JobId) -> Result<(), ServiceError> {
        ensure_admin(principal)?;
        self.jobs.deactivate(id).map(|_| ()).map_err(|err| match err {
            crate::store::StoreError::NotFound => ServiceError::NotFound("Job not found"),
            other => other.into(),
        })
    }

    /// Candidate applies for a job. A duplicate application for the same
    /// (job, user) pair is rejected before anything is persisted.
    pub fn apply(
        &self,
        principal: &Principal,
        job_id: &JobId,
        request: ApplyRequest,
    ) -> Result<Application, ServiceError> {
        ensure_candidate(principal)?;
        self.jobs
            .get(job_id)?
            .ok_or(ServiceError::NotFound("Job not found"))?;

        if request.cv_url.trim().is_empty() {
            return Err(ServiceError::validation("cvUrl", "Please upload your CV"));
        }
        if request.cover_letter.trim().is_empty() {
            return Err(ServiceError::validation(
                "coverLetter",
                "Please provide a cover letter",
            ));
        }

        if self
            .applications
            .find_existing(job_id, &principal.id)?
            .is_some()
        {
            self.discard_upload(&request.cv_url);
            return Err(ServiceError::Conflict(
                "You have already applied for this job".to_string(),
            ));
        }

        let inserted = self.applications.insert(NewApplication {
            job: job_id.clone(),
            user: principal.id.clone(),
            name: request.name,
            email: request.email,
            phone: request.phone,
            cv_url: Some(request.cv_url.clone()),
            cover_letter: request.cover_letter,
            status: ApplicationStatus::Pending,
            applied_at: None,
        });

        match inserted {
            Ok(application) => Ok(application),
            Err(err) => {
                self.discard_upload(&request.cv_url);
                Err(err.into())
            }
        }
    }

    fn discard_upload(&self, path: &str) {
        if let Err(err) = self.files.remove(path) {
            warn!(%path, %err, "failed to remove orphaned CV upload");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::store::memory::MemoryStores;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingCleanup {
        removed: Mutex<Vec<String>>,
    }

    impl FileCleanup for RecordingCleanup {
        fn remove(&self, path: &str) -> std::io::Result<()> {
            self.removed.lock().expect("cleanup mutex").push(path.to_string());
            Ok(())
        }
    }

    fn service(stores: &MemoryStores) -> (JobService, Arc<RecordingCleanup>) {
        let cleanup = Arc::new(RecordingCleanup::default());
        (
            JobService::new(
                stores.jobs.clone(),
                stores.applications.clone(),
                cleanup.clone(),
            ),
            cleanup,
        )
    }

    fn seed_job(stores: &MemoryStores) -> Job {
        stores
            .jobs
            .insert(NewJob {
                title: "Backend Engineer".to_string(),
                company: "Fortemove".to_string(),
                location: "Remote".to_string(),
                ..NewJob::default()
            })
            .expect("job inserts")
    }

    fn apply_request(cv: &str) -> ApplyRequest {
        ApplyRequest {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            phone: None,
            cover_letter: "I would like this job".to_string(),
            cv_url: cv.to_string(),
        }
    }

    #[test]
    fn duplicate_apply_is_rejected_and_upload_discarded() {
        let stores = MemoryStores::default();
        let (service, cleanup) = service(&stores);
        let job = seed_job(&stores);
        let candidate = Principal::new("user-1", Role::Candidate);

        service
            .apply(&candidate, &job.id, apply_request("uploads/cv-1.pdf"))
            .expect("first apply succeeds");
        let err = service
            .apply(&candidate, &job.id, apply_request("uploads/cv-2.pdf"))
            .expect_err("second apply is a conflict");

        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(stores.applications.count().expect("count"), 1);
        assert_eq!(
            *cleanup.removed.lock().expect("cleanup mutex"),
            vec!["uploads/cv-2.pdf".to_string()]
        );
    }

    #[test]
    fn non_candidate_cannot_apply() {
        let stores = MemoryStores::default();
        let (service, _) = service(&stores);
        let job = seed_job(&stores);
        let owner = Principal::new("user-9", Role::BusinessOwner);

        let err = service
            .apply(&owner, &job.id, apply_request("uploads/cv.pdf"))
            .expect_err("denied");
        assert!(matches!(err, ServiceError::Access(_)));
    }

    #[test]
    fn inactive_jobs_are_hidden_from_listing() {
        let stores = MemoryStores::default();
        let (service, _) = service(&stores);
        let job = seed_job(&stores);
        let admin = Principal::new("admin-1", Role::Admin);

        assert_eq!(service.list_active(&ListParams::new()).expect("lists").len(), 1);
        service.delete(&admin, &job.id).expect("soft deletes");
        assert!(service.list_active(&ListParams::new()).expect("lists").is_empty());
        // Still retrievable directly; deletion is only a flag.
        assert!(!service.get(&job.id).expect("still stored").active);
    }

    #[test]
    fn create_requires_admin() {
        let stores = MemoryStores::default();
        let (service, _) = service(&stores);
        let candidate = Principal::new("user-1", Role::Candidate);
        let err = service
            .create(
                &candidate,
                NewJob {
                    title: "X".to_string(),
                    company: "Y".to_string(),
                    location: "Z".to_string(),
                    ..NewJob::default()
                },
            )
            .expect_err("denied");
        assert!(matches!(err, ServiceError::Access(_)));
    }
}
