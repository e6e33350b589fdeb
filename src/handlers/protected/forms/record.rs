use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde_json::Value;
use uuid::Uuid;

use crate::api::format::outcome_to_api_value;
use crate::app::AppState;
use crate::auth::Actor;
use crate::middleware::{ApiResponse, ApiResult};

/// PUT /api/forms/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(payload) = payload?;
    let outcome = state.forms.update(&actor, id, payload).await?;
    Ok(ApiResponse::success(outcome_to_api_value(
        &outcome,
        "form",
        &state.forms.settings().front_url,
    )))
}

/// DELETE /api/forms/:id
pub async fn destroy(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let outcome = state.forms.destroy(&actor, id).await?;
    Ok(ApiResponse::success(outcome_to_api_value(
        &outcome,
        "form",
        &state.forms.settings().front_url,
    )))
}

/// POST /api/forms/:id/duplicate
pub async fn duplicate(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let outcome = state.forms.duplicate(&actor, id).await?;
    Ok(ApiResponse::success(outcome_to_api_value(
        &outcome,
        "new_form",
        &state.forms.settings().front_url,
    )))
}

/// PUT /api/forms/:id/regenerate-link/:option where option is `slug` or `uuid`
pub async fn regenerate_link(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((id, option)): Path<(Uuid, String)>,
) -> ApiResult<Value> {
    let outcome = state.forms.regenerate_link(&actor, id, &option).await?;
    Ok(ApiResponse::success(outcome_to_api_value(
        &outcome,
        "form",
        &state.forms.settings().front_url,
    )))
}
