use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::access::Principal;
use crate::domain::{ApplicationId, ApplicationStatus, FormId, Role, UserId};
use crate::query::ListParams;
use crate::services::ServiceError;

use super::{deleted, success, success_list, ApiError, AppContext};

pub(super) fn router() -> Router<AppContext> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/users", get(list_users))
        .route("/users/:id", axum::routing::patch(update_user_role).delete(delete_user))
        .route("/applications", get(list_applications))
        .route(
            "/applications/:id",
            get(get_application)
                .patch(update_application_status)
                .delete(delete_application),
        )
        .route("/questionnaires", get(list_questionnaires))
        .route("/questionnaires/:id", axum::routing::delete(delete_questionnaire))
        .route("/talents", get(list_talents))
        .route("/talents/:id", axum::routing::delete(delete_talent))
}

#[derive(Debug, Deserialize)]
struct RoleUpdate {
    role: String,
}

#[derive(Debug, Deserialize)]
struct StatusUpdate {
    status: String,
}

async fn dashboard(
    State(ctx): State<AppContext>,
    principal: Principal,
) -> Result<Json<serde_json::Value>, ApiError> {
    let dashboard = ctx.admin.dashboard(&principal)?;
    Ok(success(serde_json::to_value(dashboard).map_err(ServiceError::from)?))
}

async fn list_users(
    State(ctx): State<AppContext>,
    principal: Principal,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let users = ctx.admin.list_users(&principal, &ListParams::from(params))?;
    Ok(success_list(users.len(), json!({ "users": users })))
}

async fn update_user_role(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(id): Path<String>,
    Json(update): Json<RoleUpdate>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let role = Role::parse(&update.role).ok_or_else(|| {
        ServiceError::validation("role", format!("'{}' is not a valid role", update.role))
    })?;
    let user = ctx.admin.update_user_role(&principal, &UserId(id), role)?;
    Ok(success(json!({ "user": user })))
}

async fn delete_user(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(id): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ctx.admin.delete_user(&principal, &UserId(id))?;
    Ok(deleted())
}

async fn list_applications(
    State(ctx): State<AppContext>,
    principal: Principal,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let applications = ctx
        .admin
        .list_applications(&principal, &ListParams::from(params))?;
    Ok(success_list(
        applications.len(),
        json!({ "applications": applications }),
    ))
}

async fn get_application(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let application = ctx.admin.get_application(&principal, &ApplicationId(id))?;
    Ok(success(json!({ "application": application })))
}

async fn update_application_status(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let status = ApplicationStatus::parse(&update.status).ok_or_else(|| {
        ServiceError::validation(
            "status",
            format!("'{}' is not a valid application status", update.status),
        )
    })?;
    let application =
        ctx.admin
            .update_application_status(&principal, &ApplicationId(id), status)?;
    Ok(success(json!({ "application": application })))
}

async fn delete_application(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(id): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ctx.admin
        .delete_application(&principal, &ApplicationId(id))?;
    Ok(deleted())
}

async fn list_questionnaires(
    State(ctx): State<AppContext>,
    principal: Principal,
) -> Result<Json<serde_json::Value>, ApiError> {
    let forms = ctx.admin.questionnaires(&principal)?;
    Ok(success_list(forms.len(), json!({ "forms": forms })))
}

async fn delete_questionnaire(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(id): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ctx.admin
        .delete_questionnaire(&principal, &FormId(id))?;
    Ok(deleted())
}

async fn list_talents(
    State(ctx): State<AppContext>,
    principal: Principal,
) -> Result<Json<serde_json::Value>, ApiError> {
    let talents = ctx.admin.talents(&principal)?;
    Ok(success_list(talents.len(), json!({ "talents": talents })))
}

async fn delete_talent(
    State(ctx): State<AppContext>,
    principal: Principal,
    Path(id): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ctx.admin.delete_talent(&principal, &FormId(id))?;
    Ok(deleted())
}
