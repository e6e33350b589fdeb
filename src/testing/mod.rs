use chrono::Duration;
use std::sync::Arc;
use uuid::Uuid;

use crate::app::{AppState, Backends};
use crate::auth::Actor;
use crate::database::memory::{MemoryFormRepository, MemoryRecordStore, MemoryWorkspaceRepository};
use crate::database::models::Workspace;
use crate::services::FormServiceSettings;
use crate::storage::MemoryBlobStorage;

pub const FRONT_URL: &str = "https://forms.test";
pub const APP_URL: &str = "https://api.forms.test";
pub const JWT_SECRET: &str = "test-secret";

/// In-memory backends with one workspace and one member
pub struct TestContext {
    pub forms: Arc<MemoryFormRepository>,
    pub workspaces: Arc<MemoryWorkspaceRepository>,
    pub records: Arc<MemoryRecordStore>,
    pub storage: Arc<MemoryBlobStorage>,
    pub workspace: Workspace,
    pub actor: Actor,
}

impl TestContext {
    pub async fn new(is_pro: bool) -> Self {
        let workspaces = Arc::new(MemoryWorkspaceRepository::new());
        let workspace = Workspace::new(if is_pro { "Pro team" } else { "Free team" }, is_pro);
        let actor = Actor {
            user_id: Uuid::new_v4(),
            email: "owner@example.com".to_string(),
        };
        workspaces.insert_workspace(workspace.clone()).await;
        workspaces.add_member(workspace.id, actor.user_id).await;

        Self {
            forms: Arc::new(MemoryFormRepository::new()),
            workspaces,
            records: Arc::new(MemoryRecordStore::default()),
            storage: Arc::new(MemoryBlobStorage::new()),
            workspace,
            actor,
        }
    }

    pub fn settings() -> FormServiceSettings {
        FormServiceSettings {
            page_size: 10,
            front_url: FRONT_URL.to_string(),
            app_url: APP_URL.to_string(),
            max_asset_bytes: 50_000_000,
            temporary_url_ttl: Duration::minutes(5),
        }
    }

    pub fn state(&self) -> AppState {
        AppState::new(
            Backends {
                forms: self.forms.clone(),
                workspaces: self.workspaces.clone(),
                records: self.records.clone(),
                storage: self.storage.clone(),
            },
            Self::settings(),
            JWT_SECRET,
            None,
        )
    }

    /// A signed-in user that belongs to no workspace
    pub fn stranger() -> Actor {
        Actor {
            user_id: Uuid::new_v4(),
            email: "stranger@example.com".to_string(),
        }
    }
}
