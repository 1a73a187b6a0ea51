use std::sync::Arc;

use serde::Serialize;

use crate::access::{ensure_candidate, Principal};
use crate::domain::{ApplicationId, ApplicationStatus, ApplicationView};
use crate::store::{populate_applications, ApplicationStore, JobStore, UserStore};

use super::ServiceError;

/// Status counts shown on the candidate dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateDashboard {
    pub total_applications: usize,
    pub pending: usize,
    pub reviewed: usize,
    pub rejected: usize,
    pub accepted: usize,
}

/// Candidate-only views, implicitly scoped to the principal's own records.
pub struct CandidateService {
    jobs: Arc<dyn JobStore>,
    users: Arc<dyn UserStore>,
    applications: Arc<dyn ApplicationStore>,
}

impl CandidateService {
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

    pub fn my_applications(
        &self,
        principal: &Principal,
    ) -> Result<Vec<ApplicationView>, ServiceError> {
        ensure_candidate(principal)?;
        let mut own: Vec<_> = self
            .applications
            .all()?
            .into_iter()
            .filter(|application| application.user == principal.id)
            .collect();
        own.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
        Ok(populate_applications(own, &*self.jobs, &*self.users)?)
    }

    /// Owner-scoped lookup: an id belonging to someone else is simply not
    /// found here, the same as a missing record.
    pub fn my_application(
        &self,
        principal: &Principal,
        id: &ApplicationId,
    ) -> Result<ApplicationView, ServiceError> {
        ensure_candidate(principal)?;
        let application = self
            .applications
            .get(id)?
            .filter(|application| application.user == principal.id)
            .ok_or(ServiceError::NotFound("No application found with that ID"))?;
        Ok(crate::store::populate_application(
            application,
            &*self.jobs,
            &*self.users,
        )?)
    }

    pub fn dashboard(&self, principal: &Principal) -> Result<CandidateDashboard, ServiceError> {
        ensure_candidate(principal)?;
        let mut dashboard = CandidateDashboard::default();
        for application in self.applications.all()? {
            if application.user != principal.id {
                continue;
            }
            dashboard.total_applications += 1;
            match application.status {
                ApplicationStatus::Pending => dashboard.pending += 1,
                ApplicationStatus::Reviewed => dashboard.reviewed += 1,
                ApplicationStatus::Rejected => dashboard.rejected += 1,
                ApplicationStatus::Accepted => dashboard.accepted += 1,
            }
        }
        Ok(dashboard)
    }
}
