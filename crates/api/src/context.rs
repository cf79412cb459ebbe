use taskhub_auth::{SessionClaim, SystemRole};
use taskhub_core::AccountId;

/// Authenticated session context for a request.
///
/// Inserted by the session middleware; immutable for the request's lifetime.
#[derive(Debug, Clone)]
pub struct SessionContext {
    claim: SessionClaim,
}

impl SessionContext {
    pub fn new(claim: SessionClaim) -> Self {
        Self { claim }
    }

    pub fn claim(&self) -> &SessionClaim {
        &self.claim
    }

    pub fn account_id(&self) -> AccountId {
        self.claim.account_id
    }

    pub fn role(&self) -> SystemRole {
        self.claim.role
    }
}
