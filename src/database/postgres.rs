use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{FormRow, StoreRecord, Workspace, WorkspaceMember};
use crate::database::repository::{page_offset, FormRepository, Page, RecordStore, WorkspaceRepository};
use crate::forms::FormDefinition;

const FORM_COLUMNS: &str = r#"
    id, workspace_id, creator_id, title, slug, visibility,
    properties, removed_properties, settings, created_at, updated_at
"#;

pub struct PgFormRepository {
    pool: PgPool,
}

impl PgFormRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn rows_to_forms(rows: Vec<FormRow>) -> Result<Vec<FormDefinition>, DatabaseError> {
    rows.into_iter().map(FormDefinition::try_from).collect()
}

#[async_trait]
impl FormRepository for PgFormRepository {
    async fn find(&self, id: Uuid) -> Result<FormDefinition, DatabaseError> {
        let sql = format!("SELECT {} FROM forms WHERE id = $1", FORM_COLUMNS);
        let row = sqlx::query_as::<_, FormRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Form {} not found", id)))?;
        row.try_into()
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, DatabaseError> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM forms WHERE slug = $1)")
            .bind(slug)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn list_for_workspace(
        &self,
        workspace_id: Uuid,
        page: u32,
        per_page: u32,
    ) -> Result<Page<FormDefinition>, DatabaseError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM forms WHERE workspace_id = $1")
            .bind(workspace_id)
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {} FROM forms WHERE workspace_id = $1 ORDER BY updated_at DESC, id LIMIT $2 OFFSET $3",
            FORM_COLUMNS
        );
        let rows = sqlx::query_as::<_, FormRow>(&sql)
            .bind(workspace_id)
            .bind(per_page as i64)
            .bind(page_offset(page, per_page) as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(Page {
            items: rows_to_forms(rows)?,
            page,
            per_page,
            total,
        })
    }

    async fn list_for_workspaces(&self, workspace_ids: &[Uuid]) -> Result<Vec<FormDefinition>, DatabaseError> {
        if workspace_ids.is_empty() {
            return Ok(vec![]);
        }
        let sql = format!(
            "SELECT {} FROM forms WHERE workspace_id = ANY($1) ORDER BY updated_at DESC, id",
            FORM_COLUMNS
        );
        let rows = sqlx::query_as::<_, FormRow>(&sql)
            .bind(workspace_ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        rows_to_forms(rows)
    }

    async fn create(&self, form: FormDefinition) -> Result<FormDefinition, DatabaseError> {
        let sql = format!(
            r#"
            INSERT INTO forms (
                id, workspace_id, creator_id, title, slug, visibility,
                properties, removed_properties, settings, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            FORM_COLUMNS
        );
        let row = sqlx::query_as::<_, FormRow>(&sql)
            .bind(form.id)
            .bind(form.workspace_id)
            .bind(form.creator_id)
            .bind(&form.data.title)
            .bind(&form.slug)
            .bind(form.data.visibility.as_str())
            .bind(Json(&form.data.properties))
            .bind(Json(&form.removed_properties))
            .bind(Json(&form.data.settings))
            .bind(form.created_at)
            .bind(form.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "Form slug"))?;
        row.try_into()
    }

    async fn update(&self, id: Uuid, form: FormDefinition) -> Result<FormDefinition, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE forms SET
                title = $2, slug = $3, visibility = $4,
                properties = $5, removed_properties = $6, settings = $7,
                updated_at = now()
            WHERE id = $1
            RETURNING {}
            "#,
            FORM_COLUMNS
        );
        let row = sqlx::query_as::<_, FormRow>(&sql)
            .bind(id)
            .bind(&form.data.title)
            .bind(&form.slug)
            .bind(form.data.visibility.as_str())
            .bind(Json(&form.data.properties))
            .bind(Json(&form.removed_properties))
            .bind(Json(&form.data.settings))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "Form slug"))?
            .ok_or_else(|| DatabaseError::NotFound(format!("Form {} not found", id)))?;
        row.try_into()
    }

    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM forms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Form {} not found", id)));
        }
        Ok(())
    }

    async fn count_by_creator(&self, creator_id: Uuid) -> Result<i64, DatabaseError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM forms WHERE creator_id = $1")
            .bind(creator_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

pub struct PgWorkspaceRepository {
    pool: PgPool,
}

impl PgWorkspaceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkspaceRepository for PgWorkspaceRepository {
    async fn find(&self, id: Uuid) -> Result<Workspace, DatabaseError> {
        sqlx::query_as::<_, Workspace>("SELECT id, name, is_pro FROM workspaces WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Workspace {} not found", id)))
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Workspace>, DatabaseError> {
        let workspaces = sqlx::query_as::<_, Workspace>(
            r#"
            SELECT w.id, w.name, w.is_pro
            FROM workspaces w
            JOIN user_workspace uw ON uw.workspace_id = w.id
            WHERE uw.user_id = $1
            ORDER BY w.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(workspaces)
    }

    async fn is_member(&self, workspace_id: Uuid, user_id: Uuid) -> Result<bool, DatabaseError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM user_workspace WHERE workspace_id = $1 AND user_id = $2)",
        )
        .bind(workspace_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn members(&self, workspace_id: Uuid) -> Result<Vec<WorkspaceMember>, DatabaseError> {
        let members = sqlx::query_as::<_, WorkspaceMember>(
            "SELECT user_id, workspace_id, role FROM user_workspace WHERE workspace_id = $1",
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }
}

pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn list_records(&self, workspace_id: Uuid) -> Result<Vec<StoreRecord>, DatabaseError> {
        let records = sqlx::query_as::<_, StoreRecord>(
            "SELECT name, alternate_code FROM stores WHERE workspace_id = $1 ORDER BY position, name",
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}
