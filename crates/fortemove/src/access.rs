//! Role-scoped access policy. Every service call receives the acting
//! principal explicitly; there is no ambient request-scoped user.

use serde::{Deserialize, Serialize};

use crate::domain::{Application, Role, UserId};

/// The authenticated actor behind a request, as handed over by the
/// external auth gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: UserId,
    pub role: Role,
}

impl Principal {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: UserId(id.into()),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("this action requires the admin role")]
    AdminOnly,
    #[error("this action is available to candidates only")]
    CandidateOnly,
    #[error("you are not authorized to view this application")]
    NotApplicationOwner,
    #[error("business owners cannot view applications directly")]
    BusinessOwnerBlocked,
}

pub fn ensure_admin(principal: &Principal) -> Result<(), AccessError> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(AccessError::AdminOnly)
    }
}

pub fn ensure_candidate(principal: &Principal) -> Result<(), AccessError> {
    if principal.role == Role::Candidate {
        Ok(())
    } else {
        Err(AccessError::CandidateOnly)
    }
}

/// Single-application visibility: admins see everything, candidates see
/// their own, business owners are blocked outright.
pub fn ensure_can_view_application(
    principal: &Principal,
    application: &Application,
) -> Result<(), AccessError> {
    match principal.role {
        Role::Admin => Ok(()),
        Role::BusinessOwner => Err(AccessError::BusinessOwnerBlocked),
        Role::Candidate => {
            if application.user == principal.id {
                Ok(())
            } else {
                Err(AccessError::NotApplicationOwner)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApplicationId, ApplicationStatus, JobId};
    use chrono::Utc;

    fn application_owned_by(user: &str) -> Application {
        let now = Utc::now();
        Application {
            id: ApplicationId("app-000001".to_string()),
            job: JobId("job-000001".to_string()),
            user: UserId(user.to_string()),
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            phone: None,
            cv_url: Some("uploads/cv.pdf".to_string()),
            cover_letter: "Hello".to_string(),
            status: ApplicationStatus::Pending,
            applied_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn candidate_sees_only_their_own_application() {
        let application = application_owned_by("user-1");
        let owner = Principal::new("user-1", Role::Candidate);
        let other = Principal::new("user-2", Role::Candidate);

        assert!(ensure_can_view_application(&owner, &application).is_ok());
        assert_eq!(
            ensure_can_view_application(&other, &application),
            Err(AccessError::NotApplicationOwner)
        );
    }

    #[test]
    fn business_owner_is_blocked_regardless_of_ownership() {
        let application = application_owned_by("user-1");
        let principal = Principal::new("user-1", Role::BusinessOwner);
        assert_eq!(
            ensure_can_view_application(&principal, &application),
            Err(AccessError::BusinessOwnerBlocked)
        );
    }

    #[test]
    fn admin_sees_everything() {
        let application = application_owned_by("user-1");
        let principal = Principal::new("admin-1", Role::Admin);
        assert!(ensure_can_view_application(&principal, &application).is_ok());
    }
}
