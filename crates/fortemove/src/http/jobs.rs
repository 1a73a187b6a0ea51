use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::access::Principal;
use crate::domain::{ApplicationId, JobId, JobPatch, NewJob};
use crate::query::ListParams;
use crate::services::jobs::ApplyRequest;

use super::{created, deleted, success, success_list, ApiError, AppContext};

pub(super) fn router() -> Router<AppContext> {
    Router::new()
        .route("/", get(list_jobs).post(create_job))
        .route("/:id", get(get_job).patch(update_job).delete(delete_job))
        .route("/:id/apply", post(apply_for_job))
}

pub(super) fn candidate_router() -> Router<AppContext> {
    Router::new()
        .route("/my-applications", get(my_applications))
        .route("/my-applications/:id", get(my_application))
        .route("/dashboard", get(candidate_dashboard))
}

async fn list_jobs(
    State(ctx): State<AppContext>,
    _principal: Principal,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let jobs = ctx.jobs.list_active(&ListParams::from(params))?;
    Ok(success_list(jobs.len(), json!({ "jobs": jobs })))
}

async fn get_job(
    State(ctx): State<AppContext>,
    _principal: Principal,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let job = ctx.jobs.get(&JobId(id))?;
    Ok(success(json!({ "job": job })))
}

async fn create_job(
    State(ctx): State<AppContext>,
    principal: Principal,
    Json(new): Json<NewJob>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let job = ctx.jobs.create(&principal, new)?;
    Ok(created(json!({ "job": job })))
}

async fn update_job(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(id): Path<String>,
    Json(patch): Json<JobPatch>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let job = ctx.jobs.update(&principal, &JobId(id), patch)?;
    Ok(success(json!({ "job": job })))
}

async fn delete_job(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(id): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ctx.jobs.delete(&principal, &JobId(id))?;
    Ok(deleted())
}

async fn apply_for_job(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(id): Path<String>,
    Json(request): Json<ApplyRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let application = ctx.jobs.apply(&principal, &JobId(id), request)?;
    Ok(created(json!({ "application": application })))
}

async fn my_applications(
    State(ctx): State<AppContext>,
    principal: Principal,
) -> Result<Json<serde_json::Value>, ApiError> {
    let applications = ctx.candidate.my_applications(&principal)?;
    Ok(success_list(
        applications.len(),
        json!({ "applications": applications }),
    ))
}

async fn my_application(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let application = ctx
        .candidate
        .my_application(&principal, &ApplicationId(id))?;
    Ok(success(json!({ "application": application })))
}

async fn candidate_dashboard(
    State(ctx): State<AppContext>,
    principal: Principal,
) -> Result<Json<serde_json::Value>, ApiError> {
    let dashboard = ctx.candidate.dashboard(&principal)?;
    Ok(success(json!({ "dashboard": dashboard })))
}
