//! Account record and storage seams.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use taskhub_core::{AccountId, Email, ProjectId};

use crate::roles::{ProjectRole, SystemRole};

// ─────────────────────────────────────────────────────────────────────────────
// Account
// ─────────────────────────────────────────────────────────────────────────────

/// Durable account record: the identity root.
///
/// # Invariants
/// - `email` is normalized and unique.
/// - `lockout_expires_at` is non-null only while `failed_attempts` has
///   reached the lockout threshold.
/// - A successful login or an expired lockout resets `failed_attempts` to 0
///   and clears `lockout_expires_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub email: Email,
    pub display_name: String,

    /// Opaque PHC hash string; only `PasswordHasher` interprets it.
    pub password_hash: String,

    pub role: SystemRole,
    pub failed_attempts: u32,
    pub lockout_expires_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Storage fault. Expected authentication outcomes are never modeled here;
/// this is the caller's generic 5xx.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Seams
// ─────────────────────────────────────────────────────────────────────────────

/// Persistent account store.
///
/// The lockout update is conditional on the currently persisted counter so
/// concurrent failed attempts on the same account never lose increments;
/// attempts on different accounts must not block each other.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up an account by its normalized email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, StoreError>;

    /// Conditionally set the lockout fields.
    ///
    /// Applies only while the persisted counter still equals
    /// `expected_failed_attempts`. Returns `false` when the record has moved
    /// on (caller re-reads and retries) or no longer exists.
    async fn update_lockout_state(
        &self,
        id: AccountId,
        expected_failed_attempts: u32,
        failed_attempts: u32,
        lockout_expires_at: Option<DateTime<Utc>>,
    ) -> Result<bool, StoreError>;

    /// Record a successful login: counter to zero, lockout cleared,
    /// last-login stamped.
    async fn update_login_success(
        &self,
        id: AccountId,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError>;
}

/// Project-membership source consumed by the permission resolver.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    async fn role_of(
        &self,
        account_id: AccountId,
        project_id: ProjectId,
    ) -> Result<Option<ProjectRole>, StoreError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Test Doubles
// ─────────────────────────────────────────────────────────────────────────────
