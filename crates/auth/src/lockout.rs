//! Per-account failed-attempt tracking and lockout.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::store::{Account, StoreError, UserStore};

/// Bounded optimistic retries for the conditional counter update. A conflict
/// means a concurrent attempt on the same account won the write; we re-read
/// and reapply on top of the fresher state.
const MAX_UPDATE_RETRIES: u32 = 8;

/// Tracks failed-attempt counters and lockout expiry against the durable
/// account record.
///
/// Lockouts expire lazily: the next `is_locked` check after expiry clears
/// the state, no background sweep involved.
pub struct LockoutTracker {
    store: Arc<dyn UserStore>,
    threshold: u32,
    duration: Duration,
}

impl LockoutTracker {
    pub fn new(store: Arc<dyn UserStore>, threshold: u32, duration: Duration) -> Self {
        Self {
            store,
            threshold,
            duration,
        }
    }

    /// True iff the account is currently locked out.
    ///
    /// An already-expired lockout is cleared in place and persisted; the
    /// caller's `account` is updated to match.
    pub async fn is_locked(
        &self,
        account: &mut Account,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        match account.lockout_expires_at {
            Some(expiry) if now < expiry => Ok(true),
            Some(_) => {
                let applied = self
                    .store
                    .update_lockout_state(account.id, account.failed_attempts, 0, None)
                    .await?;
                if applied {
                    account.failed_attempts = 0;
                    account.lockout_expires_at = None;
                    return Ok(false);
                }
                // Lost the race: someone else already cleared or re-locked.
                // The fresher persisted state decides.
                if let Some(fresh) = self.store.find_by_email(&account.email).await? {
                    *account = fresh;
                    if let Some(expiry) = account.lockout_expires_at {
                        return Ok(now < expiry);
                    }
                }
                Ok(false)
            }
            None => Ok(false),
        }
    }

    /// Record a failed attempt; locks the account when the counter reaches
    /// the threshold.
    pub async fn record_failure(
        &self,
        account: &Account,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut current = account.clone();

        for _ in 0..MAX_UPDATE_RETRIES {
            let next = current.failed_attempts.saturating_add(1);
            let lockout_expires_at = if next >= self.threshold {
                Some(now + self.duration)
            } else {
                current.lockout_expires_at
            };

            let applied = self
                .store
                .update_lockout_state(
                    current.id,
                    current.failed_attempts,
                    next,
                    lockout_expires_at,
                )
                .await?;

            if applied {
                if next >= self.threshold {
                    tracing::warn!(account = %current.id, "account locked after repeated failures");
                }
                return Ok(());
            }

            match self.store.find_by_email(&current.email).await? {
                Some(fresh) => current = fresh,
                // Account deleted mid-flight; nothing left to count against.
                None => return Ok(()),
            }
        }

        Err(StoreError::Unavailable(
            "lockout update kept conflicting".into(),
        ))
    }

    /// Record a successful login: counter reset, lockout cleared, last-login
    /// stamped. A verified correct password always clears lockout state.
    pub async fn record_success(
        &self,
        account: &Account,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.store.update_login_success(account.id, now).await
    }
}
