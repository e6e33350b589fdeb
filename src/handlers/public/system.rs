use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::DatabaseManager;

/// GET / - service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Form Builder API",
            "version": version,
            "description": "Form definitions, Pro feature cleaning and asset uploads",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "assets": "/forms/assets/:file_name (public)",
                "forms": "/api/forms[/:id] (protected)",
                "workspace_forms": "/api/workspaces/:workspace_id/forms (protected)",
                "uploads": "/api/forms/assets/upload, /api/forms/:id/uploads/:file_name (protected)",
            }
        }
    }))
}

/// GET /health - liveness plus database reachability when PostgreSQL backs the service
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    let Some(pool) = &state.pool else {
        return (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "database": "memory" }
            })),
        );
    };

    match DatabaseManager::health_check(pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "database": "ok" }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": true,
                    "message": "database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": { "status": "degraded", "timestamp": now }
                })),
            )
        }
    }
}
