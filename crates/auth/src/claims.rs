//! Session claim model (transport-agnostic).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use taskhub_core::{AccountId, Email};

use crate::roles::SystemRole;

/// The minimal verified-identity payload issued after authentication.
///
/// Immutable once issued; renewal mints a new claim rather than mutating
/// this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaim {
    pub account_id: AccountId,

    /// Normalized email of the account at issuance time.
    pub email: Email,

    pub display_name: String,

    /// System role granted for the session's lifetime.
    pub role: SystemRole,

    pub issued_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimError {
    #[error("session has expired")]
    Expired,

    #[error("session not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid session time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate a claim's time window.
///
/// A claim is valid through its expiry instant and `Expired` strictly after
/// it. Note: this validates the *claims* only; token decoding and signature
/// verification are the codec's job.
pub fn validate_claim(claim: &SessionClaim, now: DateTime<Utc>) -> Result<(), ClaimError> {
    if claim.expires_at <= claim.issued_at {
        return Err(ClaimError::InvalidTimeWindow);
    }
    if now < claim.issued_at {
        return Err(ClaimError::NotYetValid);
    }
    if now > claim.expires_at {
        return Err(ClaimError::Expired);
    }
    Ok(())
}
