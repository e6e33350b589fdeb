use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::forms::{FormData, FormDefinition, FormSettings, Property, Visibility};

/// Row of the `forms` table. Properties, ledger and settings are JSONB.
#[derive(Debug, Clone, FromRow)]
pub struct FormRow {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub creator_id: Uuid,
    pub title: String,
    pub slug: String,
    pub visibility: String,
    pub properties: Json<Vec<Property>>,
    pub removed_properties: Json<Vec<Property>>,
    pub settings: Json<FormSettings>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<FormRow> for FormDefinition {
    type Error = DatabaseError;

    fn try_from(row: FormRow) -> Result<Self, Self::Error> {
        let visibility: Visibility = row
            .visibility
            .parse()
            .map_err(|e: String| DatabaseError::InvalidRow(format!("form {}: {}", row.id, e)))?;

        Ok(FormDefinition {
            id: row.id,
            workspace_id: row.workspace_id,
            creator_id: row.creator_id,
            slug: row.slug,
            data: FormData {
                title: row.title,
                visibility,
                properties: row.properties.0,
                settings: row.settings.0,
            },
            removed_properties: row.removed_properties.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
