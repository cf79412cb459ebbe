//! Session issuance and renewal.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::claims::{ClaimError, SessionClaim, validate_claim};
use crate::store::Account;

// ─────────────────────────────────────────────────────────────────────────────
// Token Codec Seam
// ─────────────────────────────────────────────────────────────────────────────

/// Tamper-evident token codec contract.
///
/// The issuer treats tokens as opaque: serialize a claim to a signed token,
/// parse and verify a token back to a claim or reject it. The cryptography
/// lives entirely with the implementor.
pub trait TokenCodec: Send + Sync {
    fn encode(&self, claim: &SessionClaim) -> Result<String, TokenError>;

    fn decode(&self, token: &str) -> Result<SessionClaim, TokenError>;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Garbage, wrong signature, wrong shape. Deliberately detail-free.
    #[error("invalid token")]
    Invalid,

    #[error("token has expired")]
    Expired,

    #[error("token encoding failed: {0}")]
    Encoding(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Issuer
// ─────────────────────────────────────────────────────────────────────────────

/// Mints time-bounded session claims for verified accounts.
#[derive(Debug, Clone)]
pub struct SessionIssuer {
    lifetime: Duration,
}

impl SessionIssuer {
    pub fn new(lifetime: Duration) -> Self {
        Self { lifetime }
    }

    /// Issue a fresh claim for a verified account.
    pub fn issue(&self, account: &Account, now: DateTime<Utc>) -> SessionClaim {
        SessionClaim {
            account_id: account.id,
            email: account.email.clone(),
            display_name: account.display_name.clone(),
            role: account.role,
            issued_at: now,
            expires_at: now + self.lifetime,
        }
    }

    /// Renew an unexpired claim.
    ///
    /// Renewal only happens once more than half the lifetime has elapsed;
    /// earlier calls return the claim unchanged, which bounds refresh
    /// chattiness without shortening any session. Expired claims are
    /// rejected.
    pub fn renew(
        &self,
        claim: &SessionClaim,
        now: DateTime<Utc>,
    ) -> Result<SessionClaim, ClaimError> {
        validate_claim(claim, now)?;

        let elapsed = now - claim.issued_at;
        if elapsed * 2 <= self.lifetime {
            return Ok(claim.clone());
        }

        Ok(SessionClaim {
            issued_at: now,
            expires_at: now + self.lifetime,
            ..claim.clone()
        })
    }
}
