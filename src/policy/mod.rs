// Authorization decisions for form operations

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::database::{DatabaseError, WorkspaceRepository};
use crate::forms::{FormError, FormResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAbility {
    ViewAny,
    View,
    Create,
    Update,
    Delete,
}

impl fmt::Display for FormAbility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormAbility::ViewAny => "viewAny",
            FormAbility::View => "view",
            FormAbility::Create => "create",
            FormAbility::Update => "update",
            FormAbility::Delete => "delete",
        };
        f.write_str(name)
    }
}

#[async_trait]
pub trait FormPolicy: Send + Sync {
    /// `workspace_id` is the workspace owning the form, or receiving it on create.
    /// ViewAny carries no workspace.
    async fn allows(
        &self,
        user_id: Uuid,
        ability: FormAbility,
        workspace_id: Option<Uuid>,
    ) -> Result<bool, DatabaseError>;
}

/// Members of a workspace may do anything with its forms
pub struct MembershipPolicy {
    workspaces: Arc<dyn WorkspaceRepository>,
}

impl MembershipPolicy {
    pub fn new(workspaces: Arc<dyn WorkspaceRepository>) -> Self {
        Self { workspaces }
    }
}

#[async_trait]
impl FormPolicy for MembershipPolicy {
    async fn allows(
        &self,
        user_id: Uuid,
        ability: FormAbility,
        workspace_id: Option<Uuid>,
    ) -> Result<bool, DatabaseError> {
        match (ability, workspace_id) {
            (FormAbility::ViewAny, _) => Ok(true),
            (_, Some(workspace_id)) => self.workspaces.is_member(workspace_id, user_id).await,
            (_, None) => Ok(false),
        }
    }
}

/// Forbidden unless the policy allows the ability
pub async fn authorize(
    policy: &dyn FormPolicy,
    user_id: Uuid,
    ability: FormAbility,
    workspace_id: Option<Uuid>,
) -> FormResult<()> {
    if policy.allows(user_id, ability, workspace_id).await? {
        return Ok(());
    }
    tracing::warn!("User {} denied '{}' on workspace {:?}", user_id, ability, workspace_id);
    Err(FormError::forbidden("This action is unauthorized."))
}
