//! Work items tracked within a project.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taskhub_core::{AccountId, DomainError, ProjectId, WorkItemId};

const MAX_TITLE_LEN: usize = 300;

/// Lifecycle state of a work item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkItemStatus {
    Open,
    InProgress,
    Done,
}

impl core::fmt::Display for WorkItemStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            WorkItemStatus::Open => f.write_str("open"),
            WorkItemStatus::InProgress => f.write_str("in_progress"),
            WorkItemStatus::Done => f.write_str("done"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: WorkItemId,
    pub project_id: ProjectId,
    pub title: String,
    pub status: WorkItemStatus,
    pub created_by: AccountId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkItem {
    /// Validate and construct a work item in the `Open` state.
    pub fn new(
        id: WorkItemId,
        project_id: ProjectId,
        title: &str,
        created_by: AccountId,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let title = validate_title(title)?;
        Ok(Self {
            id,
            project_id,
            title,
            status: WorkItemStatus::Open,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn set_status(&mut self, status: WorkItemStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }

    pub fn rename(&mut self, title: &str, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.title = validate_title(title)?;
        self.updated_at = now;
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::validation("work item title cannot be empty"));
    }
    if title.len() > MAX_TITLE_LEN {
        return Err(DomainError::validation("work item title too long"));
    }
    Ok(title.to_string())
}
