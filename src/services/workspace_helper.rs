use std::sync::Arc;
use uuid::Uuid;

use crate::auth::Actor;
use crate::database::models::{StoreRecord, WorkspaceMember};
use crate::database::{RecordStore, WorkspaceRepository};
use crate::forms::FormResult;
use crate::policy::{authorize, FormAbility, FormPolicy};

/// Read-only lookups scoped to one workspace
pub struct WorkspaceHelper {
    workspaces: Arc<dyn WorkspaceRepository>,
    records: Arc<dyn RecordStore>,
    policy: Arc<dyn FormPolicy>,
}

impl WorkspaceHelper {
    pub fn new(
        workspaces: Arc<dyn WorkspaceRepository>,
        records: Arc<dyn RecordStore>,
        policy: Arc<dyn FormPolicy>,
    ) -> Self {
        Self {
            workspaces,
            records,
            policy,
        }
    }

    pub async fn all_users(&self, actor: &Actor, workspace_id: Uuid) -> FormResult<Vec<WorkspaceMember>> {
        let workspace = self.workspaces.find(workspace_id).await?;
        authorize(self.policy.as_ref(), actor.user_id, FormAbility::View, Some(workspace.id)).await?;
        Ok(self.workspaces.members(workspace.id).await?)
    }

    pub async fn records(&self, actor: &Actor, workspace_id: Uuid) -> FormResult<Vec<StoreRecord>> {
        let workspace = self.workspaces.find(workspace_id).await?;
        authorize(self.policy.as_ref(), actor.user_id, FormAbility::View, Some(workspace.id)).await?;
        Ok(self.records.list_records(workspace.id).await?)
    }
}
