use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;

use crate::domain::{NewQuestionnaire, NewTalent};

use super::{created, ApiError, AppContext};

/// Public intake forms; submission requires no principal.
pub(super) fn router() -> Router<AppContext> {
    Router::new()
        .route("/business", post(submit_business_form))
        .route("/talent", post(submit_talent_form))
}

async fn submit_business_form(
    State(ctx): State<AppContext>,
    Json(new): Json<NewQuestionnaire>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let form = ctx.forms.submit_questionnaire(new)?;
    Ok(created(json!({ "form": form })))
}

async fn submit_talent_form(
    State(ctx): State<AppContext>,
    Json(new): Json<NewTalent>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let form = ctx.forms.submit_talent(new)?;
    Ok(created(json!({ "form": form })))
}
