//! Credential verification: the single authorize-or-reject decision.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use taskhub_core::Email;

use crate::claims::SessionClaim;
use crate::lockout::LockoutTracker;
use crate::password::{PasswordHashError, PasswordHasher};
use crate::rate_limit::RateLimiter;
use crate::session::SessionIssuer;
use crate::store::{StoreError, UserStore};

// ─────────────────────────────────────────────────────────────────────────────
// Failure Taxonomy
// ─────────────────────────────────────────────────────────────────────────────

/// Expected authentication outcome, deliberately coarse.
///
/// Unknown email and wrong password surface as the same variant. A locked
/// account may disclose a retry time but never the attempt counter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    /// Malformed request; no state mutated, no identity looked up.
    #[error("malformed login request")]
    InvalidInput,

    /// Source exceeded its attempt budget; nothing identity-specific leaks.
    #[error("too many attempts, slow down")]
    RateLimited,

    /// Wrong password or unknown email; intentionally the same variant.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Identity known but temporarily blocked.
    #[error("account temporarily locked; retry in {retry_after_secs}s")]
    AccountLocked { retry_after_secs: i64 },
}

/// Authentication error: an expected rejection or an infrastructure fault.
///
/// Rejections are normal return values; faults are the caller's generic
/// 5xx and must never be folded into the rejection taxonomy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error(transparent)]
    Rejected(#[from] AuthFailure),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Hash(#[from] PasswordHashError),
}

// ─────────────────────────────────────────────────────────────────────────────
// Verifier
// ─────────────────────────────────────────────────────────────────────────────

/// Orchestrates rate limiting, lockout, password verification, and claim
/// issuance into one decision.
pub struct CredentialVerifier {
    rate_limiter: Arc<RateLimiter>,
    lockout: LockoutTracker,
    hasher: Arc<PasswordHasher>,
    users: Arc<dyn UserStore>,
    issuer: SessionIssuer,
}

impl CredentialVerifier {
    pub fn new(
        rate_limiter: Arc<RateLimiter>,
        lockout: LockoutTracker,
        hasher: Arc<PasswordHasher>,
        users: Arc<dyn UserStore>,
        issuer: SessionIssuer,
    ) -> Self {
        Self {
            rate_limiter,
            lockout,
            hasher,
            users,
            issuer,
        }
    }

    /// Authenticate one login attempt from `source_key`.
    ///
    /// The order is load-bearing: the per-source rate limit is consumed
    /// before anything identity-specific happens, so a malformed request
    /// still counts against its source. After admission, input validation
    /// runs before any store access.
    pub async fn authenticate(
        &self,
        source_key: &str,
        email: &str,
        password: &str,
    ) -> Result<SessionClaim, AuthError> {
        if !self.rate_limiter.admit(source_key) {
            tracing::debug!(source = source_key, "login attempt rate limited");
            return Err(AuthFailure::RateLimited.into());
        }

        let email = match Email::parse(email) {
            Ok(email) if !password.is_empty() => email,
            _ => return Err(AuthFailure::InvalidInput.into()),
        };

        let now = Utc::now();

        let Some(mut account) = self.users.find_by_email(&email).await? else {
            // Same work as a real comparison, same failure kind: an unknown
            // address must not be observable through timing or the response.
            self.hasher.dummy_verify();
            return Err(AuthFailure::InvalidCredentials.into());
        };

        if self.lockout.is_locked(&mut account, now).await? {
            let retry_after_secs = account
                .lockout_expires_at
                .map(|expiry| (expiry - now).num_seconds().max(0))
                .unwrap_or(0);
            return Err(AuthFailure::AccountLocked { retry_after_secs }.into());
        }

        if !self.hasher.verify(password, &account.password_hash)? {
            self.lockout.record_failure(&account, now).await?;
            return Err(AuthFailure::InvalidCredentials.into());
        }

        self.lockout.record_success(&account, now).await?;
        tracing::debug!(account = %account.id, "login succeeded");
        Ok(self.issuer.issue(&account, now))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
