use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::io::Cursor;

use crate::access::Principal;
use crate::export::{ExportOutput, ExportQuery};
use crate::services::ServiceError;

use super::{ApiError, AppContext};

pub(super) fn router() -> Router<AppContext> {
    Router::new()
        .route("/applications/import", post(import_applications))
        .route("/applications/export", get(export_applications))
        .route("/applications/export/template", get(export_template))
}

/// Body is the raw CSV document (the upload middleware strips the
/// multipart envelope before it reaches us).
async fn import_applications(
    State(ctx): State<AppContext>,
    principal: Principal,
    body: String,
) -> Result<Json<serde_json::Value>, ApiError> {
    if body.trim().is_empty() {
        return Err(ServiceError::validation("file", "Please upload a file").into());
    }

    let summary = ctx
        .transfer
        .import_applications(&principal, Cursor::new(body.into_bytes()))?;

    let message = format!(
        "Imported {} applications successfully",
        summary.imported_count
    );
    let mut payload = serde_json::to_value(&summary).map_err(ServiceError::from)?;
    if let Some(object) = payload.as_object_mut() {
        object.insert("status".to_string(), json!("success"));
        object.insert("message".to_string(), json!(message));
    }
    Ok(Json(payload))
}

async fn export_applications(
    State(ctx): State<AppContext>,
    principal: Principal,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    match ctx.transfer.export_applications(&principal, &query)? {
        ExportOutput::Csv(csv) => Ok(csv_attachment("applications.csv", csv)),
        ExportOutput::Json(rows) => Ok((
            StatusCode::OK,
            [(
                header::CONTENT_DISPOSITION,
                "attachment; filename=applications.json",
            )],
            Json(rows),
        )
            .into_response()),
    }
}

async fn export_template(
    State(ctx): State<AppContext>,
    principal: Principal,
) -> Result<Response, ApiError> {
    let csv = ctx.transfer.import_template(&principal)?;
    Ok(csv_attachment("application_import_template.csv", csv))
}

fn csv_attachment(filename: &str, body: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={filename}"),
            ),
        ],
        body,
    )
        .into_response()
}
