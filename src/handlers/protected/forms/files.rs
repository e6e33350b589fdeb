use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Redirect,
    Extension, Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::Actor;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::UploadAssetRequest;

/// POST /api/forms/assets/upload
///
/// Body: `{ "url": "<name>_<uuid>.<ext>" | "<uuid>", "type": "files"? }`.
/// Moves the pending upload into form assets and returns its public URL.
pub async fn upload_asset(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<UploadAssetRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(request) = payload?;
    let uploaded = state.forms.upload_asset(&actor, request).await?;
    Ok(ApiResponse::success(json!({
        "message": uploaded.message,
        "url": uploaded.url,
    })))
}

/// GET /api/forms/:id/uploads/:file_name - redirect to a short-lived link
pub async fn view_file(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((id, file_name)): Path<(Uuid, String)>,
) -> Result<Redirect, ApiError> {
    let url = state.forms.view_file(&actor, id, &file_name).await?;
    Ok(Redirect::temporary(url.as_str()))
}
