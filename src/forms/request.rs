// Validation of create/update payloads into typed FormData

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::forms::error::{FormError, FormResult};
use crate::forms::form::{FormData, FormSettings, Visibility};
use crate::forms::property::Property;

/// Keys owned by the server or only present on the resource representation.
/// Clients often echo a fetched form back, so these are dropped rather than rejected.
const IGNORED_KEYS: &[&str] = &[
    "id",
    "slug",
    "creator_id",
    "removed_properties",
    "created_at",
    "updated_at",
    "share_url",
    "cleanings",
    "is_pro",
    "workspace_is_pro",
    "user_is_owner",
];

/// A validated create or update request
#[derive(Debug, Clone, PartialEq)]
pub struct FormRequest {
    pub workspace_id: Option<Uuid>,
    pub data: FormData,
}

impl FormRequest {
    pub fn from_value(payload: Value) -> FormResult<Self> {
        let mut fields = match payload {
            Value::Object(map) => map,
            _ => return Err(FormError::validation("Request body must be a JSON object")),
        };

        let workspace_id = match fields.remove("workspace_id") {
            None | Some(Value::Null) => None,
            Some(Value::String(raw)) => Some(
                Uuid::parse_str(&raw).map_err(|_| FormError::validation("workspace_id must be a valid UUID"))?,
            ),
            Some(_) => return Err(FormError::validation("workspace_id must be a valid UUID")),
        };

        let title = match fields.remove("title") {
            Some(Value::String(title)) if !title.trim().is_empty() => title,
            _ => return Err(FormError::validation("The title field is required")),
        };

        let visibility = match fields.remove("visibility") {
            None | Some(Value::Null) => Visibility::default(),
            Some(Value::String(raw)) => raw.parse::<Visibility>().map_err(FormError::validation)?,
            Some(_) => return Err(FormError::validation("visibility must be a string")),
        };

        let properties = match fields.remove("properties") {
            Some(Value::Array(items)) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| Property::from_value(item, index))
                .collect::<FormResult<Vec<_>>>()?,
            Some(_) => return Err(FormError::validation("properties must be an array")),
            None => return Err(FormError::validation("The properties field is required")),
        };

        for key in IGNORED_KEYS {
            fields.remove(*key);
        }

        let settings: FormSettings = serde_json::from_value(Value::Object(fields))
            .map_err(|e| FormError::validation(format!("Invalid form settings: {}", e)))?;

        Ok(Self {
            workspace_id,
            data: FormData {
                title,
                visibility,
                properties,
                settings,
            },
        })
    }

    /// Create requests must name the target workspace
    pub fn require_workspace(&self) -> FormResult<Uuid> {
        self.workspace_id
            .ok_or_else(|| FormError::validation("The workspace_id field is required"))
    }
}

/// Flat wire shape of FormData, matching what `from_value` accepts
pub fn form_data_to_map(data: &FormData) -> Map<String, Value> {
    match serde_json::to_value(data) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}
