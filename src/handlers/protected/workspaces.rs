use axum::{
    extract::{Path, State},
    Extension,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::Actor;
use crate::database::models::{StoreRecord, WorkspaceMember};
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/workspaces/:workspace_id/users
pub async fn users(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(workspace_id): Path<Uuid>,
) -> ApiResult<Vec<WorkspaceMember>> {
    let members = state.workspaces.all_users(&actor, workspace_id).await?;
    Ok(ApiResponse::success(members))
}

/// GET /api/workspaces/:workspace_id/records - entries that feed select auto-fill
pub async fn records(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(workspace_id): Path<Uuid>,
) -> ApiResult<Vec<StoreRecord>> {
    let records = state.workspaces.records(&actor, workspace_id).await?;
    Ok(ApiResponse::success(records))
}
