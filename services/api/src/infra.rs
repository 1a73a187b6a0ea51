use fortemove::domain::{NewJob, NewUser, Role};
use fortemove::store::memory::MemoryStores;
use fortemove::store::{JobStore, StoreError, UserStore};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads a small fixture set for local exploration: two jobs, an admin
/// account, and a candidate account.
pub(crate) fn seed_stores(stores: &MemoryStores) -> Result<(), StoreError> {
    stores.jobs.insert(NewJob {
        title: "Software Developer".to_string(),
        company: "Fortemove".to_string(),
        description: "Build and ship product features across the platform".to_string(),
        requirements: "3+ years of backend experience".to_string(),
        location: "Remote".to_string(),
        salary_visible: true,
        salary: Some(85_000),
        ..NewJob::default()
    })?;
    stores.jobs.insert(NewJob {
        title: "Office Manager".to_string(),
        company: "Fortemove".to_string(),
        description: "Keep the office running".to_string(),
        requirements: "Organized, personable".to_string(),
        location: "London".to_string(),
        ..NewJob::default()
    })?;

    let admin = stores.users.insert(NewUser {
        name: "Local Admin".to_string(),
        email: "admin@example.com".to_string(),
        phone: None,
        password_hash: "not-a-credential".to_string(),
        role: Role::Admin,
        google_id: None,
    })?;
    let candidate = stores.users.insert(NewUser {
        name: "Jane Candidate".to_string(),
        email: "jane@example.com".to_string(),
        phone: Some("+441234567890".to_string()),
        password_hash: "not-a-credential".to_string(),
        role: Role::Candidate,
        google_id: None,
    })?;

    info!(admin = %admin.id, candidate = %candidate.id, "seeded local fixture data");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_creates_jobs_and_accounts() {
        let stores = MemoryStores::default();
        seed_stores(&stores).expect("seeds");
        assert_eq!(stores.jobs.all().expect("jobs").len(), 2);
        let admin = stores
            .users
            .find_by_email("admin@example.com")
            .expect("lookup")
            .expect("seeded");
        assert_eq!(admin.role, Role::Admin);
    }
}
