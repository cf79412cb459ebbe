//! In-memory store implementations for dev and tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use taskhub_auth::{Account, MembershipStore, ProjectRole, StoreError, UserStore};
use taskhub_core::{AccountId, Email, ProjectId, WorkItemId};
use taskhub_projects::{Project, WorkItem};

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("store lock poisoned".into())
}

// ─────────────────────────────────────────────────────────────────────────────
// User Store
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory account store.
///
/// The conditional lockout update runs under the write lock, which makes it
/// atomic with respect to concurrent attempts on the same account; readers
/// of other accounts proceed through the shared read lock.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    accounts: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an account (provisioning path, not a login path).
    pub fn upsert(&self, account: Account) {
        if let Ok(mut accounts) = self.accounts.write() {
            accounts.insert(account.id, account);
        }
    }

    pub fn get(&self, id: AccountId) -> Option<Account> {
        self.accounts.read().ok()?.get(&id).cloned()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().map_err(poisoned)?;
        Ok(accounts.values().find(|a| a.email == *email).cloned())
    }

    async fn update_lockout_state(
        &self,
        id: AccountId,
        expected_failed_attempts: u32,
        failed_attempts: u32,
        lockout_expires_at: Option<DateTime<Utc>>,
    ) -> Result<bool, StoreError> {
        let mut accounts = self.accounts.write().map_err(poisoned)?;
        match accounts.get_mut(&id) {
            Some(account) if account.failed_attempts == expected_failed_attempts => {
                account.failed_attempts = failed_attempts;
                account.lockout_expires_at = lockout_expires_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn update_login_success(
        &self,
        id: AccountId,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write().map_err(poisoned)?;
        if let Some(account) = accounts.get_mut(&id) {
            account.failed_attempts = 0;
            account.lockout_expires_at = None;
            account.last_login_at = Some(at);
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Membership Store
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory project-membership store.
#[derive(Debug, Default)]
pub struct InMemoryMembershipStore {
    rows: RwLock<HashMap<(AccountId, ProjectId), ProjectRole>>,
}

impl InMemoryMembershipStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&self, account_id: AccountId, project_id: ProjectId, role: ProjectRole) {
        if let Ok(mut rows) = self.rows.write() {
            rows.insert((account_id, project_id), role);
        }
    }

    pub fn remove(&self, account_id: AccountId, project_id: ProjectId) {
        if let Ok(mut rows) = self.rows.write() {
            rows.remove(&(account_id, project_id));
        }
    }

    /// Drop every membership of a project (project deletion support).
    pub fn clear_project(&self, project_id: ProjectId) {
        if let Ok(mut rows) = self.rows.write() {
            rows.retain(|(_, p), _| *p != project_id);
        }
    }

    /// Projects the account is a member of.
    pub fn projects_for(&self, account_id: AccountId) -> Vec<ProjectId> {
        match self.rows.read() {
            Ok(rows) => rows
                .keys()
                .filter(|(a, _)| *a == account_id)
                .map(|(_, p)| *p)
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

#[async_trait]
impl MembershipStore for InMemoryMembershipStore {
    async fn role_of(
        &self,
        account_id: AccountId,
        project_id: ProjectId,
    ) -> Result<Option<ProjectRole>, StoreError> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows.get(&(account_id, project_id)).copied())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Project Store
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory project/work-item store backing the CRUD surface.
#[derive(Debug, Default)]
pub struct InMemoryProjectStore {
    projects: RwLock<HashMap<ProjectId, Project>>,
    work_items: RwLock<HashMap<WorkItemId, WorkItem>>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_project(&self, project: Project) {
        if let Ok(mut projects) = self.projects.write() {
            projects.insert(project.id, project);
        }
    }

    pub fn get_project(&self, id: ProjectId) -> Option<Project> {
        self.projects.read().ok()?.get(&id).cloned()
    }

    pub fn list_projects(&self) -> Vec<Project> {
        match self.projects.read() {
            Ok(projects) => {
                let mut all: Vec<Project> = projects.values().cloned().collect();
                all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
                all
            }
            Err(_) => Vec::new(),
        }
    }

    /// Remove a project and all of its work items.
    pub fn remove_project(&self, id: ProjectId) -> bool {
        let removed = match self.projects.write() {
            Ok(mut projects) => projects.remove(&id).is_some(),
            Err(_) => false,
        };
        if removed {
            if let Ok(mut items) = self.work_items.write() {
                items.retain(|_, item| item.project_id != id);
            }
        }
        removed
    }

    pub fn insert_work_item(&self, item: WorkItem) {
        if let Ok(mut items) = self.work_items.write() {
            items.insert(item.id, item);
        }
    }

    pub fn get_work_item(&self, id: WorkItemId) -> Option<WorkItem> {
        self.work_items.read().ok()?.get(&id).cloned()
    }

    pub fn list_work_items(&self, project_id: ProjectId) -> Vec<WorkItem> {
        match self.work_items.read() {
            Ok(items) => {
                let mut all: Vec<WorkItem> = items
                    .values()
                    .filter(|item| item.project_id == project_id)
                    .cloned()
                    .collect();
                all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
                all
            }
            Err(_) => Vec::new(),
        }
    }

    /// Apply a mutation to a work item in place.
    pub fn update_work_item<F>(&self, id: WorkItemId, mutate: F) -> Option<WorkItem>
    where
        F: FnOnce(&mut WorkItem),
    {
        let mut items = self.work_items.write().ok()?;
        let item = items.get_mut(&id)?;
        mutate(item);
        Some(item.clone())
    }

    pub fn remove_work_item(&self, id: WorkItemId) -> bool {
        match self.work_items.write() {
            Ok(mut items) => items.remove(&id).is_some(),
            Err(_) => false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use taskhub_auth::SystemRole;

    use super::*;

    fn account(email: &str) -> Account {
        Account {
            id: AccountId::new(),
            email: Email::parse(email).unwrap(),
            display_name: "Frank".to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            role: SystemRole::Employee,
            failed_attempts: 0,
            lockout_expires_at: None,
            last_login_at: None,
        }
    }

    #[tokio::test]
    async fn find_by_email_matches_normalized_address() {
        let store = InMemoryUserStore::new();
        let seeded = account("frank@example.com");
        store.upsert(seeded.clone());

        let found = store
            .find_by_email(&Email::parse("FRANK@example.com").unwrap())
            .await
            .unwrap();
        assert_eq!(found, Some(seeded));
    }

    #[tokio::test]
    async fn conditional_update_rejects_stale_counter() {
        let store = InMemoryUserStore::new();
        let seeded = account("frank@example.com");
        store.upsert(seeded.clone());

        assert!(
            store
                .update_lockout_state(seeded.id, 0, 1, None)
                .await
                .unwrap()
        );
        // Same expectation again: the counter already moved to 1.
        assert!(
            !store
                .update_lockout_state(seeded.id, 0, 1, None)
                .await
                .unwrap()
        );
        assert_eq!(store.get(seeded.id).unwrap().failed_attempts, 1);
    }

    #[tokio::test]
    async fn conditional_update_on_missing_account_is_a_clean_miss() {
        let store = InMemoryUserStore::new();
        assert!(
            !store
                .update_lockout_state(AccountId::new(), 0, 1, None)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn login_success_resets_lockout_fields() {
        let store = InMemoryUserStore::new();
        let mut seeded = account("frank@example.com");
        seeded.failed_attempts = 4;
        seeded.lockout_expires_at = Some(Utc::now());
        store.upsert(seeded.clone());

        let now = Utc::now();
        store.update_login_success(seeded.id, now).await.unwrap();

        let after = store.get(seeded.id).unwrap();
        assert_eq!(after.failed_attempts, 0);
        assert_eq!(after.lockout_expires_at, None);
        assert_eq!(after.last_login_at, Some(now));
    }

    #[test]
    fn removing_a_project_drops_its_work_items() {
        let store = InMemoryProjectStore::new();
        let owner = AccountId::new();
        let now = Utc::now();

        let project = Project::new(ProjectId::new(), "Apollo", "", owner, now).unwrap();
        let other = Project::new(ProjectId::new(), "Gemini", "", owner, now).unwrap();
        store.insert_project(project.clone());
        store.insert_project(other.clone());

        let item = WorkItem::new(WorkItemId::new(), project.id, "Design", owner, now).unwrap();
        let kept = WorkItem::new(WorkItemId::new(), other.id, "Plan", owner, now).unwrap();
        store.insert_work_item(item.clone());
        store.insert_work_item(kept.clone());

        assert!(store.remove_project(project.id));
        assert!(store.get_work_item(item.id).is_none());
        assert!(store.get_work_item(kept.id).is_some());
    }

    #[test]
    fn membership_queries() {
        let store = InMemoryMembershipStore::new();
        let account_id = AccountId::new();
        let project_a = ProjectId::new();
        let project_b = ProjectId::new();

        store.assign(account_id, project_a, ProjectRole::Owner);
        store.assign(account_id, project_b, ProjectRole::Tester);
        store.assign(AccountId::new(), project_a, ProjectRole::Developer);

        let mut projects = store.projects_for(account_id);
        projects.sort_by_key(|p| p.to_string());
        assert_eq!(projects.len(), 2);

        store.clear_project(project_a);
        assert_eq!(store.projects_for(account_id), vec![project_b]);
    }
}
