use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::access::{ensure_admin, ensure_can_view_application, Principal};
use crate::domain::{
    ApplicationId, ApplicationStatus, ApplicationView, FormId, Questionnaire, Role, Talent, User,
    UserId,
};
use crate::query::{ListParams, QueryPlan};
use crate::store::{
    populate_application, populate_applications, ApplicationStore, FormStore, JobStore,
    StoreError, UserStore,
};

use super::ServiceError;

/// Platform-wide totals for the admin dashboard. `total_users` excludes
/// admins, matching how the dashboard has always reported it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub total_jobs: usize,
    pub total_applications: usize,
    pub total_users: usize,
    pub total_candidates: usize,
    pub total_business_owners: usize,
    pub total_questionnaires: usize,
    pub total_talents: usize,
}

pub struct AdminService {
    jobs: Arc<dyn JobStore>,
    users: Arc<dyn UserStore>,
    applications: Arc<dyn ApplicationStore>,
    forms: Arc<dyn FormStore>,
}

impl AdminService {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        users: Arc<dyn UserStore>,
        applications: Arc<dyn ApplicationStore>,
        forms: Arc<dyn FormStore>,
    ) -> Self {
        Self {
            jobs,
            users,
            applications,
            forms,
        }
    }

    pub fn dashboard(&self, principal: &Principal) -> Result<AdminDashboard, ServiceError> {
        ensure_admin(principal)?;
        let users = self.users.all()?;
        let count_role = |role: Role| users.iter().filter(|user| user.role == role).count();

        Ok(AdminDashboard {
            total_jobs: self.jobs.count()?,
            total_applications: self.applications.count()?,
            total_users: users.len() - count_role(Role::Admin),
            total_candidates: count_role(Role::Candidate),
            total_business_owners: count_role(Role::BusinessOwner),
            total_questionnaires: self.forms.questionnaires()?.len(),
            total_talents: self.forms.talents()?.len(),
        })
    }

    /// Users through the query pipeline (filter/search/sort/page).
    pub fn list_users(
        &self,
        principal: &Principal,
        params: &ListParams,
    ) -> Result<Vec<Value>, ServiceError> {
        ensure_admin(principal)?;
        let users: Vec<User> = self.users.all()?;
        Ok(QueryPlan::parse(params).execute(users)?)
    }

    pub fn update_user_role(
        &self,
        principal: &Principal,
        id: &UserId,
        role: Role,
    ) -> Result<User, ServiceError> {
        ensure_admin(principal)?;
        self.users.update_role(id, role).map_err(not_found_user)
    }

    pub fn delete_user(&self, principal: &Principal, id: &UserId) -> Result<(), ServiceError> {
        ensure_admin(principal)?;
        self.users.delete(id).map_err(not_found_user)
    }

    /// Applications list: populated with job/user snapshots, then run
    /// through the query pipeline so search reaches related-entity text.
    pub fn list_applications(
        &self,
        principal: &Principal,
        params: &ListParams,
    ) -> Result<Vec<Value>, ServiceError> {
        ensure_admin(principal)?;
        let views = populate_applications(
            self.applications.all()?,
            &*self.jobs,
            &*self.users,
        )?;
        Ok(QueryPlan::parse(params).execute(views)?)
    }

    /// Single-application read honoring the visibility policy: candidates
    /// reach their own record, business owners are always denied.
    pub fn get_application(
        &self,
        principal: &Principal,
        id: &ApplicationId,
    ) -> Result<ApplicationView, ServiceError> {
        let application = self
            .applications
            .get(id)?
            .ok_or(ServiceError::NotFound("No application found with that ID"))?;
        ensure_can_view_application(principal, &application)?;
        Ok(populate_application(
            application,
            &*self.jobs,
            &*self.users,
        )?)
    }

    pub fn update_application_status(
        &self,
        principal: &Principal,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<ApplicationView, ServiceError> {
        ensure_admin(principal)?;
        let application = self
            .applications
            .update_status(id, status)
            .map_err(not_found_application)?;
        Ok(populate_application(
            application,
            &*self.jobs,
            &*self.users,
        )?)
    }

    pub fn delete_application(
        &self,
        principal: &Principal,
        id: &ApplicationId,
    ) -> Result<(), ServiceError> {
        ensure_admin(principal)?;
        self.applications.delete(id).map_err(not_found_application)
    }

    pub fn questionnaires(&self, principal: &Principal) -> Result<Vec<Questionnaire>, ServiceError> {
        ensure_admin(principal)?;
        Ok(self.forms.questionnaires()?)
    }

    pub fn talents(&self, principal: &Principal) -> Result<Vec<Talent>, ServiceError> {
        ensure_admin(principal)?;
        Ok(self.forms.talents()?)
    }

    pub fn delete_questionnaire(
        &self,
        principal: &Principal,
        id: &FormId,
    ) -> Result<(), ServiceError> {
        ensure_admin(principal)?;
        self.forms.delete_questionnaire(id).map_err(|err| match err {
            StoreError::NotFound => ServiceError::NotFound("No form found with that ID"),
            other => other.into(),
        })
    }

    pub fn delete_talent(&self, principal: &Principal, id: &FormId) -> Result<(), ServiceError> {
        ensure_admin(principal)?;
        self.forms.delete_talent(id).map_err(|err| match err {
            StoreError::NotFound => ServiceError::NotFound("No talent found with that ID"),
            other => other.into(),
        })
    }
}

fn not_found_user(err: StoreError) -> ServiceError {
    match err {
        StoreError::NotFound => ServiceError::NotFound("No user found with that ID"),
        other => other.into(),
    }
}

fn not_found_application(err: StoreError) -> ServiceError {
    match err {
        StoreError::NotFound => ServiceError::NotFound("No application found with that ID"),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewApplication, NewJob, NewUser};
    use crate::store::memory::MemoryStores;

    fn service(stores: &MemoryStores) -> AdminService {
        AdminService::new(
            stores.jobs.clone(),
            stores.users.clone(),
            stores.applications.clone(),
            stores.forms.clone(),
        )
    }

    fn admin() -> Principal {
        Principal::new("admin-1", Role::Admin)
    }

    fn seed_user(stores: &MemoryStores, email: &str, role: Role) -> User {
        stores
            .users
            .insert(NewUser {
                name: "Someone".to_string(),
                email: email.to_string(),
                phone: None,
                password_hash: "hash".to_string(),
                role,
                google_id: None,
            })
            .expect("user inserts")
    }

    #[test]
    fn dashboard_excludes_admins_from_user_total() {
        let stores = MemoryStores::default();
        seed_user(&stores, "a@example.com", Role::Admin);
        seed_user(&stores, "b@example.com", Role::Candidate);
        seed_user(&stores, "c@example.com", Role::BusinessOwner);

        let dashboard = service(&stores).dashboard(&admin()).expect("dashboard");
        assert_eq!(dashboard.total_users, 2);
        assert_eq!(dashboard.total_candidates, 1);
        assert_eq!(dashboard.total_business_owners, 1);
    }

    #[test]
    fn role_update_round_trips() {
        let stores = MemoryStores::default();
        let user = seed_user(&stores, "b@example.com", Role::Candidate);
        let updated = service(&stores)
            .update_user_role(&admin(), &user.id, Role::BusinessOwner)
            .expect("updates");
        assert_eq!(updated.role, Role::BusinessOwner);
    }

    #[test]
    fn dashboard_requires_admin() {
        let stores = MemoryStores::default();
        let err = service(&stores)
            .dashboard(&Principal::new("user-1", Role::Candidate))
            .expect_err("denied");
        assert!(matches!(err, ServiceError::Access(_)));
    }

    #[test]
    fn application_status_update_touches_updated_at() {
        let stores = MemoryStores::default();
        let job = stores
            .jobs
            .insert(NewJob {
                title: "Role".to_string(),
                company: "Co".to_string(),
                location: "Remote".to_string(),
                ..NewJob::default()
            })
            .expect("job");
        let user = seed_user(&stores, "jane@example.com", Role::Candidate);
        let application = stores
            .applications
            .insert(NewApplication {
                job: job.id,
                user: user.id,
                name: "Jane".to_string(),
                email: "jane@example.com".to_string(),
                phone: None,
                cv_url: None,
                cover_letter: String::new(),
                status: ApplicationStatus::Pending,
                applied_at: None,
            })
            .expect("application");

        let view = service(&stores)
            .update_application_status(&admin(), &application.id, ApplicationStatus::Reviewed)
            .expect("updates");
        assert_eq!(view.status, ApplicationStatus::Reviewed);
        assert!(view.updated_at >= view.created_at);
    }
}
