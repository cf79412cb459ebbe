//! Project: the unit of collaboration and of scoped authorization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taskhub_core::{AccountId, DomainError, ProjectId};

const MAX_NAME_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    pub created_by: AccountId,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Validate and construct a project.
    pub fn new(
        id: ProjectId,
        name: &str,
        description: &str,
        created_by: AccountId,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("project name cannot be empty"));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(DomainError::validation("project name too long"));
        }

        let description = description.trim();
        if description.len() > MAX_DESCRIPTION_LEN {
            return Err(DomainError::validation("project description too long"));
        }

        Ok(Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            created_by,
            created_at: now,
        })
    }
}
