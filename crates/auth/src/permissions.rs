//! Fixed capability tables for the two independent hierarchies.

use serde::Serialize;

use crate::roles::{ProjectRole, SystemRole};

// ─────────────────────────────────────────────────────────────────────────────
// System Capabilities
// ─────────────────────────────────────────────────────────────────────────────

/// Capability set granted by a system role.
///
/// EMPLOYEE's `can_access_projects` grant is qualified: it only applies to
/// projects the account is a member of. `PermissionResolver` applies that
/// qualification; this table just records the raw grant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub can_view_dashboard: bool,
    pub can_access_projects: bool,
    pub can_create_projects: bool,
    pub can_manage_users: bool,
    pub can_access_system_settings: bool,
    pub can_delete_projects: bool,
}

/// The fixed system-role capability table.
pub fn capabilities_for(role: SystemRole) -> Capabilities {
    match role {
        SystemRole::RootAdmin => Capabilities {
            can_view_dashboard: true,
            can_access_projects: true,
            can_create_projects: true,
            can_manage_users: true,
            can_access_system_settings: true,
            can_delete_projects: true,
        },
        SystemRole::Admin => Capabilities {
            can_view_dashboard: true,
            can_access_projects: true,
            can_create_projects: true,
            can_manage_users: true,
            can_access_system_settings: false,
            can_delete_projects: false,
        },
        SystemRole::Employee => Capabilities {
            // Project access requires a membership row on top of this grant.
            can_view_dashboard: true,
            can_access_projects: true,
            can_create_projects: false,
            can_manage_users: false,
            can_access_system_settings: false,
            can_delete_projects: false,
        },
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Project Actions
// ─────────────────────────────────────────────────────────────────────────────

/// Project-local action gated by the project-role table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ProjectAction {
    CreateWorkItem,
    UpdateWorkItem,
    DeleteWorkItem,
    AssignRoles,
}

/// The project-role permission table, independent of the system hierarchy.
///
/// Owners may do everything; managers everything except handing out project
/// roles; developers create and update work items; testers update work items
/// (status changes, verification notes).
pub fn project_role_allows(role: ProjectRole, action: ProjectAction) -> bool {
    use ProjectAction::*;

    match role {
        ProjectRole::Owner => true,
        ProjectRole::Manager => !matches!(action, AssignRoles),
        ProjectRole::Developer => matches!(action, CreateWorkItem | UpdateWorkItem),
        ProjectRole::Tester => matches!(action, UpdateWorkItem),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_admin_has_every_capability() {
        let caps = capabilities_for(SystemRole::RootAdmin);
        assert!(caps.can_view_dashboard);
        assert!(caps.can_access_projects);
        assert!(caps.can_create_projects);
        assert!(caps.can_manage_users);
        assert!(caps.can_access_system_settings);
        assert!(caps.can_delete_projects);
    }

    #[test]
    fn admin_cannot_touch_settings_or_delete_projects() {
        let caps = capabilities_for(SystemRole::Admin);
        assert!(caps.can_create_projects);
        assert!(caps.can_manage_users);
        assert!(!caps.can_access_system_settings);
        assert!(!caps.can_delete_projects);
    }

    #[test]
    fn employee_is_read_mostly() {
        let caps = capabilities_for(SystemRole::Employee);
        assert!(caps.can_view_dashboard);
        assert!(caps.can_access_projects);
        assert!(!caps.can_create_projects);
        assert!(!caps.can_manage_users);
        assert!(!caps.can_access_system_settings);
        assert!(!caps.can_delete_projects);
    }

    #[test]
    fn owner_may_do_everything_in_project() {
        for action in [
            ProjectAction::CreateWorkItem,
            ProjectAction::UpdateWorkItem,
            ProjectAction::DeleteWorkItem,
            ProjectAction::AssignRoles,
        ] {
            assert!(project_role_allows(ProjectRole::Owner, action));
        }
    }

    #[test]
    fn manager_cannot_assign_roles() {
        assert!(project_role_allows(ProjectRole::Manager, ProjectAction::DeleteWorkItem));
        assert!(!project_role_allows(ProjectRole::Manager, ProjectAction::AssignRoles));
    }

    #[test]
    fn developer_and_tester_tables() {
        assert!(project_role_allows(ProjectRole::Developer, ProjectAction::CreateWorkItem));
        assert!(project_role_allows(ProjectRole::Developer, ProjectAction::UpdateWorkItem));
        assert!(!project_role_allows(ProjectRole::Developer, ProjectAction::DeleteWorkItem));

        assert!(project_role_allows(ProjectRole::Tester, ProjectAction::UpdateWorkItem));
        assert!(!project_role_allows(ProjectRole::Tester, ProjectAction::CreateWorkItem));
        assert!(!project_role_allows(ProjectRole::Tester, ProjectAction::AssignRoles));
    }
}
