// In-process store backends. Used when DATABASE_URL is absent and by the test suites.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{StoreRecord, Workspace, WorkspaceMember};
use crate::database::repository::{page_offset, FormRepository, Page, RecordStore, WorkspaceRepository};
use crate::forms::FormDefinition;

#[derive(Default, Clone)]
pub struct MemoryFormRepository {
    forms: Arc<RwLock<HashMap<Uuid, FormDefinition>>>,
}

impl MemoryFormRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(mut forms: Vec<FormDefinition>) -> Vec<FormDefinition> {
        forms.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        forms
    }
}

#[async_trait]
impl FormRepository for MemoryFormRepository {
    async fn find(&self, id: Uuid) -> Result<FormDefinition, DatabaseError> {
        self.forms
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(format!("Form {} not found", id)))
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, DatabaseError> {
        Ok(self.forms.read().await.values().any(|f| f.slug == slug))
    }

    async fn list_for_workspace(
        &self,
        workspace_id: Uuid,
        page: u32,
        per_page: u32,
    ) -> Result<Page<FormDefinition>, DatabaseError> {
        let matching: Vec<_> = self
            .forms
            .read()
            .await
            .values()
            .filter(|f| f.workspace_id == workspace_id)
            .cloned()
            .collect();
        let total = matching.len() as i64;
        let items = Self::sorted(matching)
            .into_iter()
            .skip(page_offset(page, per_page) as usize)
            .take(per_page as usize)
            .collect();
        Ok(Page { items, page, per_page, total })
    }

    async fn list_for_workspaces(&self, workspace_ids: &[Uuid]) -> Result<Vec<FormDefinition>, DatabaseError> {
        let matching = self
            .forms
            .read()
            .await
            .values()
            .filter(|f| workspace_ids.contains(&f.workspace_id))
            .cloned()
            .collect();
        Ok(Self::sorted(matching))
    }

    async fn create(&self, form: FormDefinition) -> Result<FormDefinition, DatabaseError> {
        let mut forms = self.forms.write().await;
        if forms.values().any(|f| f.slug == form.slug) {
            return Err(DatabaseError::Conflict("Form slug already exists".to_string()));
        }
        forms.insert(form.id, form.clone());
        Ok(form)
    }

    async fn update(&self, id: Uuid, mut form: FormDefinition) -> Result<FormDefinition, DatabaseError> {
        let mut forms = self.forms.write().await;
        if !forms.contains_key(&id) {
            return Err(DatabaseError::NotFound(format!("Form {} not found", id)));
        }
        if forms.values().any(|f| f.id != id && f.slug == form.slug) {
            return Err(DatabaseError::Conflict("Form slug already exists".to_string()));
        }
        form.id = id;
        form.updated_at = Utc::now();
        forms.insert(id, form.clone());
        Ok(form)
    }

    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        self.forms
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DatabaseError::NotFound(format!("Form {} not found", id)))
    }

    async fn count_by_creator(&self, creator_id: Uuid) -> Result<i64, DatabaseError> {
        Ok(self.forms.read().await.values().filter(|f| f.creator_id == creator_id).count() as i64)
    }
}

#[derive(Default, Clone)]
pub struct MemoryWorkspaceRepository {
    workspaces: Arc<RwLock<HashMap<Uuid, Workspace>>>,
    members: Arc<RwLock<Vec<WorkspaceMember>>>,
}

impl MemoryWorkspaceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_workspace(&self, workspace: Workspace) {
        self.workspaces.write().await.insert(workspace.id, workspace);
    }

    pub async fn add_member(&self, workspace_id: Uuid, user_id: Uuid) {
        let mut members = self.members.write().await;
        if !members.iter().any(|m| m.workspace_id == workspace_id && m.user_id == user_id) {
            members.push(WorkspaceMember {
                user_id,
                workspace_id,
                role: "admin".to_string(),
            });
        }
    }
}

#[async_trait]
impl WorkspaceRepository for MemoryWorkspaceRepository {
    async fn find(&self, id: Uuid) -> Result<Workspace, DatabaseError> {
        self.workspaces
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(format!("Workspace {} not found", id)))
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Workspace>, DatabaseError> {
        let ids: Vec<Uuid> = self
            .members
            .read()
            .await
            .iter()
            .filter(|m| m.user_id == user_id)
            .map(|m| m.workspace_id)
            .collect();
        let workspaces = self.workspaces.read().await;
        let mut found: Vec<Workspace> = ids.iter().filter_map(|id| workspaces.get(id).cloned()).collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn is_member(&self, workspace_id: Uuid, user_id: Uuid) -> Result<bool, DatabaseError> {
        Ok(self
            .members
            .read()
            .await
            .iter()
            .any(|m| m.workspace_id == workspace_id && m.user_id == user_id))
    }

    async fn members(&self, workspace_id: Uuid) -> Result<Vec<WorkspaceMember>, DatabaseError> {
        Ok(self
            .members
            .read()
            .await
            .iter()
            .filter(|m| m.workspace_id == workspace_id)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub struct MemoryRecordStore {
    records: Arc<RwLock<Vec<(Uuid, StoreRecord)>>>,
}

impl MemoryRecordStore {
    pub async fn insert(&self, workspace_id: Uuid, record: StoreRecord) {
        self.records.write().await.push((workspace_id, record));
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list_records(&self, workspace_id: Uuid) -> Result<Vec<StoreRecord>, DatabaseError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|(ws, _)| *ws == workspace_id)
            .map(|(_, record)| record.clone())
            .collect())
    }
}
