use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::database::{FormRepository, RecordStore, WorkspaceRepository};
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::policy::{FormPolicy, MembershipPolicy};
use crate::services::{FormService, FormServiceSettings, WorkspaceHelper};
use crate::storage::BlobStorage;

/// Store implementations the service runs against
pub struct Backends {
    pub forms: Arc<dyn FormRepository>,
    pub workspaces: Arc<dyn WorkspaceRepository>,
    pub records: Arc<dyn RecordStore>,
    pub storage: Arc<dyn BlobStorage>,
}

#[derive(Clone)]
pub struct AppState {
    pub forms: Arc<FormService>,
    pub workspaces: Arc<WorkspaceHelper>,
    pub jwt_secret: Arc<str>,
    /// Present when PostgreSQL backs the stores; used by /health
    pub pool: Option<PgPool>,
}

impl AppState {
    pub fn new(
        backends: Backends,
        settings: FormServiceSettings,
        jwt_secret: impl Into<Arc<str>>,
        pool: Option<PgPool>,
    ) -> Self {
        let policy: Arc<dyn FormPolicy> = Arc::new(MembershipPolicy::new(backends.workspaces.clone()));

        let workspaces = WorkspaceHelper::new(backends.workspaces.clone(), backends.records.clone(), policy.clone());
        let forms = FormService::new(
            backends.forms,
            backends.workspaces,
            backends.records,
            backends.storage,
            policy,
            settings,
        );

        Self {
            forms: Arc::new(forms),
            workspaces: Arc::new(workspaces),
            jwt_secret: jwt_secret.into(),
            pool,
        }
    }
}

pub fn router(state: AppState, config: &AppConfig) -> Router {
    let app = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/forms/assets/:file_name", get(public::show_asset))
        .route("/storage/*path", get(public::download))
        // Protected API
        .merge(api_routes(state.clone()))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .with_state(state);

    let app = if config.security.enable_cors {
        app.layer(cors_layer(&config.security.cors_origins))
    } else {
        app
    };

    if config.api.enable_request_logging {
        app.layer(TraceLayer::new_for_http())
    } else {
        app
    }
}

fn api_routes(state: AppState) -> Router<AppState> {
    use protected::{forms, workspaces};

    Router::new()
        .route("/api/forms", get(forms::index_all).post(forms::store))
        .route("/api/forms/assets/upload", post(forms::upload_asset))
        .route("/api/forms/:id", put(forms::update).delete(forms::destroy))
        .route("/api/forms/:id/duplicate", post(forms::duplicate))
        .route("/api/forms/:id/regenerate-link/:option", put(forms::regenerate_link))
        .route("/api/forms/:id/uploads/:file_name", get(forms::view_file))
        .route("/api/workspaces/:workspace_id/forms", get(forms::index))
        .route("/api/workspaces/:workspace_id/users", get(workspaces::users))
        .route("/api/workspaces/:workspace_id/records", get(workspaces::records))
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}
