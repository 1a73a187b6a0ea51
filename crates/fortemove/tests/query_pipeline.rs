use chrono::{TimeZone, Utc};
use fortemove::access::Principal;
use fortemove::domain::{ApplicationStatus, NewApplication, NewJob, NewUser, Role};
use fortemove::query::ListParams;
use fortemove::services::admin::AdminService;
use fortemove::store::memory::MemoryStores;
use fortemove::store::{ApplicationStore, JobStore, UserStore};

fn admin() -> Principal {
    Principal::new("admin-1", Role::Admin)
}

fn service(stores: &MemoryStores) -> AdminService {
    AdminService::new(
        stores.jobs.clone(),
        stores.users.clone(),
        stores.applications.clone(),
        stores.forms.clone(),
    )
}

/// Three candidates across two jobs, applied on distinct days.
fn seed(stores: &MemoryStores) {
    let backend = stores
        .jobs
        .insert(NewJob {
            title: "Backend Engineer".to_string(),
            company: "Fortemove".to_string(),
            location: "Remote".to_string(),
            ..NewJob::default()
        })
        .expect("job inserts");
    let office = stores
        .jobs
        .insert(NewJob {
            title: "Office Manager".to_string(),
            company: "Fortemove".to_string(),
            location: "London".to_string(),
            ..NewJob::default()
        })
        .expect("job inserts");

    let people = [
        ("Ada Lovelace", "ada@example.com", &backend, "pending", 1),
        ("Bo Peep", "bo@example.com", &office, "reviewed", 5),
        ("Cal Drogo", "cal@example.com", &backend, "pending", 9),
    ];
    for (name, email, job, status, day) in people {
        let user = stores
            .users
            .insert(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                phone: None,
                password_hash: "hash".to_string(),
                role: Role::Candidate,
                google_id: None,
            })
            .expect("user inserts");
        stores
            .applications
            .insert(NewApplication {
                job: job.id.clone(),
                user: user.id,
                name: name.to_string(),
                email: email.to_string(),
                phone: None,
                cv_url: None,
                cover_letter: format!("Cover letter from {name}"),
                status: ApplicationStatus::parse(status).expect("valid status"),
                applied_at: Some(Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()),
            })
            .expect("application inserts");
    }
}

#[test]
fn status_and_date_filters_narrow_the_listing() {
    let stores = MemoryStores::default();
    seed(&stores);
    let params = ListParams::new()
        .with("status", "pending")
        .with("appliedAt[gte]", "2024-03-05");

    let rows = service(&stores)
        .list_applications(&admin(), &params)
        .expect("lists");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["email"], "cal@example.com");
}

#[test]
fn search_reaches_related_job_fields() {
    let stores = MemoryStores::default();
    seed(&stores);
    let params = ListParams::new().with("search", "office");

    let rows = service(&stores)
        .list_applications(&admin(), &params)
        .expect("lists");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Bo Peep");
}

#[test]
fn default_order_is_newest_application_first() {
    let stores = MemoryStores::default();
    seed(&stores);

    let rows = service(&stores)
        .list_applications(&admin(), &ListParams::new())
        .expect("lists");
    let emails: Vec<_> = rows
        .iter()
        .map(|row| row["email"].as_str().expect("email present"))
        .collect();
    assert_eq!(
        emails,
        ["cal@example.com", "bo@example.com", "ada@example.com"]
    );
}

#[test]
fn projection_trims_rows_but_keeps_the_id() {
    let stores = MemoryStores::default();
    seed(&stores);
    let params = ListParams::new().with("fields", "name,status");

    let rows = service(&stores)
        .list_applications(&admin(), &params)
        .expect("lists");
    let first = rows[0].as_object().expect("object row");
    assert!(first.contains_key("id"));
    assert!(first.contains_key("name"));
    assert!(first.contains_key("status"));
    assert!(!first.contains_key("email"));
}

#[test]
fn paging_the_same_snapshot_covers_every_row_once() {
    let stores = MemoryStores::default();
    seed(&stores);
    let service = service(&stores);

    let all = service
        .list_applications(&admin(), &ListParams::new().with("limit", "50"))
        .expect("lists");

    let mut paged = Vec::new();
    for page in 1..=3 {
        let params = ListParams::new()
            .with("limit", "1")
            .with("page", &page.to_string());
        paged.extend(service.list_applications(&admin(), &params).expect("lists"));
    }
    assert_eq!(paged, all);
}

#[test]
fn malformed_operator_degrades_to_a_literal_filter() {
    let stores = MemoryStores::default();
    seed(&stores);
    // No field is literally named "appliedAt[between]", so nothing matches,
    // but the request still succeeds.
    let params = ListParams::new().with("appliedAt[between]", "2024-03-01");

    let rows = service(&stores)
        .list_applications(&admin(), &params)
        .expect("lists");
    assert!(rows.is_empty());
}
