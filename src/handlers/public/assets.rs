use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::app::AppState;
use crate::error::ApiError;

/// GET /forms/assets/:file_name - public redirect to a temporary link of a form asset
pub async fn show_asset(State(state): State<AppState>, Path(file_name): Path<String>) -> Result<Redirect, ApiError> {
    let url = state.forms.show_asset(&file_name).await?;
    Ok(Redirect::temporary(url.as_str()))
}
