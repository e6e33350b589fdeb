use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::forms::property::Property;

/// Who can see a form. Transitions are caller-driven; none is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Draft,
    Published,
    Closed,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Draft => "draft",
            Visibility::Published => "published",
            Visibility::Closed => "closed",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Visibility::Draft),
            "published" => Ok(Visibility::Published),
            "closed" => Ok(Visibility::Closed),
            other => Err(format!("Unknown visibility '{}'", other)),
        }
    }
}

/// Form-level settings. Gated ones are typed; presentation settings ride in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSettings {
    #[serde(default)]
    pub no_branding: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_code: Option<String>,
    #[serde(default)]
    pub editable_submissions: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The caller-editable part of a form, as submitted on create and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormData {
    pub title: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(flatten)]
    pub settings: FormSettings,
}

impl FormData {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            visibility: Visibility::default(),
            properties: Vec::new(),
            settings: FormSettings::default(),
        }
    }
}

/// A persisted form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDefinition {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub creator_id: Uuid,
    pub slug: String,
    #[serde(flatten)]
    pub data: FormData,
    /// Append-only history of deleted fields, keyed by id
    #[serde(default)]
    pub removed_properties: Vec<Property>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FormDefinition {
    pub fn new(workspace_id: Uuid, creator_id: Uuid, slug: String, data: FormData) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            workspace_id,
            creator_id,
            slug,
            data,
            removed_properties: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy under a new id and slug; properties and ledger come along
    pub fn duplicate(&self, slug: String) -> Self {
        let mut copy = self.clone();
        let now = Utc::now();
        copy.id = Uuid::new_v4();
        copy.slug = slug;
        copy.data.title = format!("Copy of {}", self.data.title);
        copy.created_at = now;
        copy.updated_at = now;
        copy
    }

    pub fn is_draft(&self) -> bool {
        self.data.visibility == Visibility::Draft
    }

    pub fn share_url(&self, front_url: &str) -> String {
        format!("{}/forms/{}", front_url.trim_end_matches('/'), self.slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_prefixes_title_and_changes_identity() {
        let form = FormDefinition::new(Uuid::new_v4(), Uuid::new_v4(), "survey-abc".into(), FormData::new("Survey"));
        let copy = form.duplicate("survey-def".into());
        assert_eq!(copy.data.title, "Copy of Survey");
        assert_ne!(copy.id, form.id);
        assert_eq!(copy.workspace_id, form.workspace_id);
        assert_eq!(copy.slug, "survey-def");
    }

    #[test]
    fn visibility_defaults_to_draft() {
        assert_eq!(FormData::new("x").visibility, Visibility::Draft);
        assert_eq!("closed".parse::<Visibility>().unwrap(), Visibility::Closed);
        assert!("public".parse::<Visibility>().is_err());
    }

    #[test]
    fn share_url_joins_front_url() {
        let form = FormDefinition::new(Uuid::new_v4(), Uuid::new_v4(), "my-form".into(), FormData::new("x"));
        assert_eq!(form.share_url("https://forms.example.com/"), "https://forms.example.com/forms/my-form");
    }
}
