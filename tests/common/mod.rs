#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Duration;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use form_builder_api::app::{router, AppState, Backends};
use form_builder_api::auth::{generate_jwt, Claims};
use form_builder_api::config::AppConfig;
use form_builder_api::database::memory::{MemoryFormRepository, MemoryRecordStore, MemoryWorkspaceRepository};
use form_builder_api::database::models::Workspace;
use form_builder_api::services::FormServiceSettings;
use form_builder_api::storage::MemoryBlobStorage;

pub const JWT_SECRET: &str = "integration-secret";
pub const FRONT_URL: &str = "https://forms.test";
pub const APP_URL: &str = "https://api.forms.test";

/// In-process app over in-memory stores, with one workspace and one member
pub struct TestApp {
    pub router: Router,
    pub storage: Arc<MemoryBlobStorage>,
    pub records: Arc<MemoryRecordStore>,
    pub workspaces: Arc<MemoryWorkspaceRepository>,
    pub workspace: Workspace,
    pub user_id: Uuid,
    pub token: String,
}

impl TestApp {
    pub async fn new(is_pro: bool) -> Self {
        let workspaces = Arc::new(MemoryWorkspaceRepository::new());
        let records = Arc::new(MemoryRecordStore::default());
        let storage = Arc::new(MemoryBlobStorage::new());

        let workspace = Workspace::new("Acme", is_pro);
        let user_id = Uuid::new_v4();
        workspaces.insert_workspace(workspace.clone()).await;
        workspaces.add_member(workspace.id, user_id).await;

        let state = AppState::new(
            Backends {
                forms: Arc::new(MemoryFormRepository::new()),
                workspaces: workspaces.clone(),
                records: records.clone(),
                storage: storage.clone(),
            },
            FormServiceSettings {
                page_size: 10,
                front_url: FRONT_URL.to_string(),
                app_url: APP_URL.to_string(),
                max_asset_bytes: 50_000_000,
                temporary_url_ttl: Duration::minutes(5),
            },
            JWT_SECRET,
            None,
        );

        let mut config = AppConfig::from_env();
        config.api.enable_request_logging = false;

        Self {
            router: router(state, &config),
            storage,
            records,
            workspaces,
            workspace,
            user_id,
            token: token_for(user_id),
        }
    }

    /// Send a request as the workspace member
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> Result<(StatusCode, Value)> {
        self.send_as(Some(self.token.as_str()), method, uri, body).await
    }

    pub async fn send_as(
        &self,
        token: Option<&str>,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let response = self.raw(token, method, uri, body).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        Ok((status, json))
    }

    pub async fn raw(
        &self,
        token: Option<&str>,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> Result<axum::response::Response> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };
        Ok(self.router.clone().oneshot(request).await?)
    }

    pub fn form_payload(&self, properties: Value) -> Value {
        serde_json::json!({
            "workspace_id": self.workspace.id.to_string(),
            "title": "Event registration",
            "visibility": "published",
            "properties": properties,
        })
    }
}

pub fn token_for(user_id: Uuid) -> String {
    let claims = Claims::new(user_id, "member@example.com", 1);
    generate_jwt(&claims, JWT_SECRET).expect("token")
}
