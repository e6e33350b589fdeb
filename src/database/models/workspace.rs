use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::forms::WorkspaceEntitlement;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Workspace {
    pub id: Uuid,
    pub name: String,
    pub is_pro: bool,
}

impl Workspace {
    pub fn new(name: impl Into<String>, is_pro: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            is_pro,
        }
    }

    pub fn entitlement(&self) -> WorkspaceEntitlement {
        WorkspaceEntitlement { is_pro: self.is_pro }
    }
}

/// Row of `user_workspace`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct WorkspaceMember {
    pub user_id: Uuid,
    pub workspace_id: Uuid,
    pub role: String,
}
