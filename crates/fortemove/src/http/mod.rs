//! Axum surface for the platform core. Routers are built here and
//! composed by the service binary, which adds health/readiness/metrics.

mod admin;
mod forms;
mod jobs;
mod transfer;

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::error;

use crate::access::Principal;
use crate::config::ImportConfig;
use crate::domain::Role;
use crate::export::ExportEngine;
use crate::import::ImportEngine;
use crate::services::admin::AdminService;
use crate::services::candidate::CandidateService;
use crate::services::forms::FormService;
use crate::services::jobs::JobService;
use crate::services::transfer::TransferService;
use crate::services::{FileCleanup, LocalFileCleanup, ServiceError};
use crate::store::memory::MemoryStores;

/// Service bundle handed to every router as axum state.
#[derive(Clone)]
pub struct AppContext {
    pub jobs: Arc<JobService>,
    pub candidate: Arc<CandidateService>,
    pub admin: Arc<AdminService>,
    pub forms: Arc<FormService>,
    pub transfer: Arc<TransferService>,
}

impl AppContext {
    pub fn from_stores(
        stores: MemoryStores,
        files: Arc<dyn FileCleanup>,
        import: &ImportConfig,
    ) -> Self {
        Self {
            jobs: Arc::new(JobService::new(
                stores.jobs.clone(),
                stores.applications.clone(),
                files,
            )),
            candidate: Arc::new(CandidateService::new(
                stores.jobs.clone(),
                stores.users.clone(),
                stores.applications.clone(),
            )),
            admin: Arc::new(AdminService::new(
                stores.jobs.clone(),
                stores.users.clone(),
                stores.applications.clone(),
                stores.forms.clone(),
            )),
            forms: Arc::new(FormService::new(stores.forms.clone())),
            transfer: Arc::new(TransferService::new(
                ImportEngine::new(
                    stores.jobs.clone(),
                    stores.users.clone(),
                    stores.applications.clone(),
                    import.max_rows,
                ),
                ExportEngine::new(stores.jobs, stores.users, stores.applications),
            )),
        }
    }

    pub fn in_memory(import: &ImportConfig) -> Self {
        Self::from_stores(
            MemoryStores::default(),
            Arc::new(LocalFileCleanup),
            import,
        )
    }
}

/// All `/api/v1` routes.
pub fn api_router(ctx: AppContext) -> Router {
    Router::new()
        .nest("/api/v1/jobs", jobs::router())
        .nest("/api/v1/candidate", jobs::candidate_router())
        .nest("/api/v1/admin", admin::router().merge(transfer::router()))
        .nest("/api/v1/forms", forms::router())
        .with_state(ctx)
}

/// Service failure mapped onto the response envelope. 4xx responses carry
/// `status: "fail"` with the real message; 5xx responses log the cause and
/// leak nothing.
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ServiceError::Validation { .. } | ServiceError::Conflict(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Access(_) => StatusCode::FORBIDDEN,
            ServiceError::Unavailable(_) | ServiceError::Serialize(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = if status.is_server_error() {
            error!(error = %self.0, "request failed");
            json!({ "status": "error", "message": "Something went very wrong!" })
        } else {
            json!({ "status": "fail", "message": self.0.to_string() })
        };

        (status, Json(body)).into_response()
    }
}

pub(crate) fn success(data: Value) -> Json<Value> {
    Json(json!({ "status": "success", "data": data }))
}

pub(crate) fn success_list(results: usize, data: Value) -> Json<Value> {
    Json(json!({ "status": "success", "results": results, "data": data }))
}

pub(crate) fn created(data: Value) -> (StatusCode, Json<Value>) {
    (
        StatusCode::CREATED,
        Json(json!({ "status": "success", "data": data })),
    )
}

pub(crate) fn deleted() -> StatusCode {
    StatusCode::NO_CONTENT
}

const PRINCIPAL_ID_HEADER: &str = "x-principal-id";
const PRINCIPAL_ROLE_HEADER: &str = "x-principal-role";

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "status": "fail", "message": message })),
    )
        .into_response()
}

/// The external auth gateway verifies the token and forwards the
/// authenticated principal in trusted headers; this extractor only
/// re-materializes it.
#[axum::async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(PRINCIPAL_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| unauthorized("You are not logged in"))?;

        let role = parts
            .headers
            .get(PRINCIPAL_ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(Role::parse)
            .ok_or_else(|| unauthorized("You are not logged in"))?;

        Ok(Principal::new(id, role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_xx_keeps_the_message() {
        let response =
            ApiError(ServiceError::NotFound("Job not found")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn five_xx_hides_the_cause() {
        let err = ServiceError::Unavailable(crate::store::StoreError::Unavailable(
            "disk on fire".to_string(),
        ));
        let response = ApiError(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
