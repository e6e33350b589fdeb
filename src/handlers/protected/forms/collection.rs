use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::api::format::{forms_to_api_values, outcome_to_api_value, page_to_api_value};
use crate::app::AppState;
use crate::auth::Actor;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    pub page: Option<u32>,
}

/// GET /api/workspaces/:workspace_id/forms?page=N
pub async fn index(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(workspace_id): Path<Uuid>,
    Query(query): Query<IndexQuery>,
) -> ApiResult<Value> {
    let page = state.forms.index(&actor, workspace_id, query.page).await?;
    Ok(ApiResponse::success(page_to_api_value(
        &page,
        &state.forms.settings().front_url,
    )))
}

/// GET /api/forms - every form across the caller's workspaces
pub async fn index_all(State(state): State<AppState>, Extension(actor): Extension<Actor>) -> ApiResult<Vec<Value>> {
    let views = state.forms.index_all(&actor).await?;
    Ok(ApiResponse::success(forms_to_api_values(
        &views,
        &state.forms.settings().front_url,
    )))
}

/// POST /api/forms
///
/// Body is the form payload plus `workspace_id`. Pro-only features the
/// workspace is not entitled to are stripped and listed under `form.cleanings`.
pub async fn store(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(payload) = payload?;
    let outcome = state.forms.store(&actor, payload).await?;
    Ok(ApiResponse::success(outcome_to_api_value(
        &outcome,
        "form",
        &state.forms.settings().front_url,
    )))
}
