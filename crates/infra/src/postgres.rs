//! Postgres-backed stores (enabled with the `postgres` feature).
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE accounts (
//!     id                 UUID PRIMARY KEY,
//!     email              TEXT NOT NULL UNIQUE,
//!     display_name       TEXT NOT NULL,
//!     password_hash      TEXT NOT NULL,
//!     role               TEXT NOT NULL,
//!     failed_attempts    INTEGER NOT NULL DEFAULT 0,
//!     lockout_expires_at TIMESTAMPTZ,
//!     last_login_at      TIMESTAMPTZ
//! );
//!
//! CREATE TABLE project_memberships (
//!     account_id UUID NOT NULL,
//!     project_id UUID NOT NULL,
//!     role       TEXT NOT NULL,
//!     PRIMARY KEY (account_id, project_id)
//! );
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use taskhub_auth::{Account, MembershipStore, ProjectRole, StoreError, SystemRole, UserStore};
use taskhub_core::{AccountId, Email, ProjectId};

fn unavailable(e: impl core::fmt::Display) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

fn row_to_account(row: &PgRow) -> Result<Account, StoreError> {
    let id: Uuid = row.try_get("id").map_err(unavailable)?;
    let email: String = row.try_get("email").map_err(unavailable)?;
    let role: String = row.try_get("role").map_err(unavailable)?;
    let failed_attempts: i32 = row.try_get("failed_attempts").map_err(unavailable)?;

    Ok(Account {
        id: AccountId::from_uuid(id),
        email: Email::parse(&email).map_err(unavailable)?,
        display_name: row.try_get("display_name").map_err(unavailable)?,
        password_hash: row.try_get("password_hash").map_err(unavailable)?,
        role: role.parse::<SystemRole>().map_err(unavailable)?,
        failed_attempts: failed_attempts.max(0) as u32,
        lockout_expires_at: row.try_get("lockout_expires_at").map_err(unavailable)?,
        last_login_at: row.try_get("last_login_at").map_err(unavailable)?,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// User Store
// ─────────────────────────────────────────────────────────────────────────────

/// Account store over Postgres.
///
/// The lockout update is a single conditional `UPDATE`; the row either
/// matches the expected counter and changes atomically, or the statement
/// touches nothing and the caller retries on fresher state.
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query(
            "SELECT id, email, display_name, password_hash, role, \
                    failed_attempts, lockout_expires_at, last_login_at \
             FROM accounts WHERE email = $1",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        row.map(|r| row_to_account(&r)).transpose()
    }

    async fn update_lockout_state(
        &self,
        id: AccountId,
        expected_failed_attempts: u32,
        failed_attempts: u32,
        lockout_expires_at: Option<DateTime<Utc>>,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE accounts SET failed_attempts = $3, lockout_expires_at = $4 \
             WHERE id = $1 AND failed_attempts = $2",
        )
        .bind(*id.as_uuid())
        .bind(expected_failed_attempts as i32)
        .bind(failed_attempts as i32)
        .bind(lockout_expires_at)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(result.rows_affected() == 1)
    }

    async fn update_login_success(
        &self,
        id: AccountId,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE accounts SET failed_attempts = 0, lockout_expires_at = NULL, \
                    last_login_at = $2 \
             WHERE id = $1",
        )
        .bind(*id.as_uuid())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Membership Store
// ─────────────────────────────────────────────────────────────────────────────

/// Project-membership lookup over Postgres.
pub struct PostgresMembershipStore {
    pool: PgPool,
}

impl PostgresMembershipStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipStore for PostgresMembershipStore {
    async fn role_of(
        &self,
        account_id: AccountId,
        project_id: ProjectId,
    ) -> Result<Option<ProjectRole>, StoreError> {
        let row = sqlx::query(
            "SELECT role FROM project_memberships \
             WHERE account_id = $1 AND project_id = $2",
        )
        .bind(*account_id.as_uuid())
        .bind(*project_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        row.map(|r| {
            let role: String = r.try_get("role").map_err(unavailable)?;
            role.parse::<ProjectRole>().map_err(unavailable)
        })
        .transpose()
    }
}
