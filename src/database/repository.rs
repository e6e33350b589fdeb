// Store interfaces consumed by the form service.
// PostgreSQL implementations live in `postgres`, in-memory ones in `memory`.

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{StoreRecord, Workspace, WorkspaceMember};
use crate::forms::FormDefinition;

/// One page of an ordered listing
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn last_page(&self) -> u32 {
        if self.per_page == 0 || self.total <= 0 {
            return 1;
        }
        ((self.total as u64 + self.per_page as u64 - 1) / self.per_page as u64) as u32
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
        }
    }
}

/// Offset for a 1-based page number
pub(crate) fn page_offset(page: u32, per_page: u32) -> u64 {
    page.saturating_sub(1) as u64 * per_page as u64
}

#[async_trait]
pub trait FormRepository: Send + Sync {
    /// NotFound when the id is unknown
    async fn find(&self, id: Uuid) -> Result<FormDefinition, DatabaseError>;

    async fn slug_exists(&self, slug: &str) -> Result<bool, DatabaseError>;

    /// Forms of one workspace, most recently updated first
    async fn list_for_workspace(
        &self,
        workspace_id: Uuid,
        page: u32,
        per_page: u32,
    ) -> Result<Page<FormDefinition>, DatabaseError>;

    async fn list_for_workspaces(&self, workspace_ids: &[Uuid]) -> Result<Vec<FormDefinition>, DatabaseError>;

    /// Conflict when the slug is taken
    async fn create(&self, form: FormDefinition) -> Result<FormDefinition, DatabaseError>;

    /// Replaces the stored form and bumps `updated_at`
    async fn update(&self, id: Uuid, form: FormDefinition) -> Result<FormDefinition, DatabaseError>;

    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError>;

    async fn count_by_creator(&self, creator_id: Uuid) -> Result<i64, DatabaseError>;
}

#[async_trait]
pub trait WorkspaceRepository: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Workspace, DatabaseError>;

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Workspace>, DatabaseError>;

    async fn is_member(&self, workspace_id: Uuid, user_id: Uuid) -> Result<bool, DatabaseError>;

    async fn members(&self, workspace_id: Uuid) -> Result<Vec<WorkspaceMember>, DatabaseError>;
}

/// External record store backing select auto-fill
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Records of one workspace in store order
    async fn list_records(&self, workspace_id: Uuid) -> Result<Vec<StoreRecord>, DatabaseError>;
}
