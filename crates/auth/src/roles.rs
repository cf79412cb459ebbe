//! System and project role hierarchies.
//!
//! Every role comparison in the codebase goes through this module; callers
//! never compare role strings directly.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use taskhub_core::DomainError;

// ─────────────────────────────────────────────────────────────────────────────
// System Role
// ─────────────────────────────────────────────────────────────────────────────

/// System-wide role: a strict total order of privilege.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemRole {
    Employee,
    Admin,
    RootAdmin,
}

impl SystemRole {
    /// Privilege rank. A higher rank implies every lower-ranked grant.
    fn rank(self) -> u8 {
        match self {
            SystemRole::Employee => 1,
            SystemRole::Admin => 2,
            SystemRole::RootAdmin => 3,
        }
    }

    /// True iff `self` carries at least the privilege of `required`.
    pub fn has_role_or_higher(self, required: SystemRole) -> bool {
        self.rank() >= required.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SystemRole::Employee => "employee",
            SystemRole::Admin => "admin",
            SystemRole::RootAdmin => "root_admin",
        }
    }
}

impl core::fmt::Display for SystemRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SystemRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "employee" => Ok(SystemRole::Employee),
            "admin" => Ok(SystemRole::Admin),
            "root_admin" => Ok(SystemRole::RootAdmin),
            other => Err(DomainError::validation(format!(
                "unknown system role: {other}"
            ))),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Project Role
// ─────────────────────────────────────────────────────────────────────────────

/// Role held within one specific project, independent of the system role.
///
/// Project roles are evaluated against their own permission table
/// (`permissions::project_role_allows`), never merged into the system rank.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectRole {
    Owner,
    Manager,
    Developer,
    Tester,
}

impl ProjectRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectRole::Owner => "owner",
            ProjectRole::Manager => "manager",
            ProjectRole::Developer => "developer",
            ProjectRole::Tester => "tester",
        }
    }
}

impl core::fmt::Display for ProjectRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(ProjectRole::Owner),
            "manager" => Ok(ProjectRole::Manager),
            "developer" => Ok(ProjectRole::Developer),
            "tester" => Ok(ProjectRole::Tester),
            other => Err(DomainError::validation(format!(
                "unknown project role: {other}"
            ))),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const ALL_ROLES: [SystemRole; 3] =
        [SystemRole::Employee, SystemRole::Admin, SystemRole::RootAdmin];

    #[test]
    fn hierarchy_is_strict_total_order() {
        assert!(SystemRole::RootAdmin.has_role_or_higher(SystemRole::Admin));
        assert!(SystemRole::RootAdmin.has_role_or_higher(SystemRole::Employee));
        assert!(SystemRole::Admin.has_role_or_higher(SystemRole::Employee));

        assert!(!SystemRole::Employee.has_role_or_higher(SystemRole::Admin));
        assert!(!SystemRole::Employee.has_role_or_higher(SystemRole::RootAdmin));
        assert!(!SystemRole::Admin.has_role_or_higher(SystemRole::RootAdmin));
    }

    #[test]
    fn hierarchy_is_reflexive() {
        for role in ALL_ROLES {
            assert!(role.has_role_or_higher(role));
        }
    }

    #[test]
    fn roles_round_trip_through_strings() {
        for role in ALL_ROLES {
            assert_eq!(role.as_str().parse::<SystemRole>().unwrap(), role);
        }
        for role in [
            ProjectRole::Owner,
            ProjectRole::Manager,
            ProjectRole::Developer,
            ProjectRole::Tester,
        ] {
            assert_eq!(role.as_str().parse::<ProjectRole>().unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_strings_rejected() {
        assert!("superuser".parse::<SystemRole>().is_err());
        assert!("guest".parse::<ProjectRole>().is_err());
    }

    fn arb_role() -> impl Strategy<Value = SystemRole> {
        prop::sample::select(ALL_ROLES.to_vec())
    }

    proptest! {
        #[test]
        fn has_role_or_higher_is_transitive(a in arb_role(), b in arb_role(), c in arb_role()) {
            if a.has_role_or_higher(b) && b.has_role_or_higher(c) {
                prop_assert!(a.has_role_or_higher(c));
            }
        }

        #[test]
        fn has_role_or_higher_is_antisymmetric(a in arb_role(), b in arb_role()) {
            if a.has_role_or_higher(b) && b.has_role_or_higher(a) {
                prop_assert_eq!(a, b);
            }
        }
    }
}
