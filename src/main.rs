use std::sync::Arc;

use form_builder_api::app::{router, AppState, Backends};
use form_builder_api::config;
use form_builder_api::database::memory::{MemoryFormRepository, MemoryRecordStore, MemoryWorkspaceRepository};
use form_builder_api::database::postgres::{PgFormRepository, PgRecordStore, PgWorkspaceRepository};
use form_builder_api::database::DatabaseManager;
use form_builder_api::is_production;
use form_builder_api::services::FormServiceSettings;
use form_builder_api::storage::LocalBlobStorage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "form_builder_api=info,tower_http=info".into()),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Form Builder API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set");
    }
    if is_production!() && config.storage.signing_secret.is_empty() {
        anyhow::bail!("STORAGE_SIGNING_SECRET must be set in production");
    }

    let storage = Arc::new(LocalBlobStorage::from_config(&config.storage));

    let (backends, pool) = if DatabaseManager::is_configured() {
        let pool = DatabaseManager::connect(&config.database).await?;
        if config.database.run_migrations {
            DatabaseManager::migrate(&pool).await?;
        }
        let backends = Backends {
            forms: Arc::new(PgFormRepository::new(pool.clone())),
            workspaces: Arc::new(PgWorkspaceRepository::new(pool.clone())),
            records: Arc::new(PgRecordStore::new(pool.clone())),
            storage,
        };
        (backends, Some(pool))
    } else {
        tracing::warn!("DATABASE_URL not set, using in-memory stores");
        let backends = Backends {
            forms: Arc::new(MemoryFormRepository::new()),
            workspaces: Arc::new(MemoryWorkspaceRepository::new()),
            records: Arc::new(MemoryRecordStore::default()),
            storage,
        };
        (backends, None)
    };

    let state = AppState::new(
        backends,
        FormServiceSettings::from_config(config),
        config.security.jwt_secret.as_str(),
        pool,
    );
    let app = router(state, config);

    // PORT wins over the configured bind address
    let bind_addr = match std::env::var("PORT").ok().and_then(|s| s.parse::<u16>().ok()) {
        Some(port) => format!("0.0.0.0:{}", port),
        None => config.api.bind_address.clone(),
    };
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Form Builder API listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
