//! Role and capability evaluation.

use std::sync::Arc;

use taskhub_core::{AccountId, ProjectId};

use crate::permissions::{Capabilities, ProjectAction, capabilities_for, project_role_allows};
use crate::roles::SystemRole;
use crate::store::{MembershipStore, StoreError};

/// Evaluates the two independent hierarchies: system role and project role.
///
/// A request is authorized when either hierarchy's applicable rule grants
/// it; the two ranks are never merged into one. Pure policy plus the single
/// stated collaborator (membership lookup): no other IO, no panics.
pub struct PermissionResolver {
    memberships: Arc<dyn MembershipStore>,
}

impl PermissionResolver {
    pub fn new(memberships: Arc<dyn MembershipStore>) -> Self {
        Self { memberships }
    }

    /// Strict total-order comparison on the system hierarchy.
    pub fn has_role_or_higher(&self, actual: SystemRole, required: SystemRole) -> bool {
        actual.has_role_or_higher(required)
    }

    /// Fixed capability set for a system role.
    pub fn permissions_for(&self, role: SystemRole) -> Capabilities {
        capabilities_for(role)
    }

    /// Project visibility.
    ///
    /// Admins and above see every project; employees carry the raw
    /// `can_access_projects` grant but need a membership row for the
    /// specific project.
    pub async fn can_access_project(
        &self,
        role: SystemRole,
        account_id: AccountId,
        project_id: ProjectId,
    ) -> Result<bool, StoreError> {
        if !capabilities_for(role).can_access_projects {
            return Ok(false);
        }
        if role.has_role_or_higher(SystemRole::Admin) {
            return Ok(true);
        }
        Ok(self
            .memberships
            .role_of(account_id, project_id)
            .await?
            .is_some())
    }

    /// Project-local action: granted by the system hierarchy (admin or
    /// higher acts in any project) or by the member's project role,
    /// whichever applicable rule says yes.
    pub async fn can_perform_project_action(
        &self,
        role: SystemRole,
        account_id: AccountId,
        project_id: ProjectId,
        action: ProjectAction,
    ) -> Result<bool, StoreError> {
        if role.has_role_or_higher(SystemRole::Admin) {
            return Ok(true);
        }
        match self.memberships.role_of(account_id, project_id).await? {
            Some(project_role) => Ok(project_role_allows(project_role, action)),
            None => Ok(false),
        }
    }
}
