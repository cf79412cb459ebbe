//! Service wiring: stores, auth core, and token codec.
//!
//! Everything is constructed exactly once here and injected into request
//! handlers by reference; there are no hidden globals anywhere below this
//! point.

use std::sync::Arc;

use anyhow::Context as _;

use taskhub_auth::{
    Account, AuthConfig, CredentialVerifier, LockoutTracker, MembershipStore, PasswordHasher,
    PermissionResolver, RateLimiter, SessionIssuer, SystemRole, TokenCodec, UserStore,
};
use taskhub_core::{AccountId, DomainError, Email};
use taskhub_infra::{InMemoryMembershipStore, InMemoryProjectStore, InMemoryUserStore, JwtCodec};

/// The service bundle shared by all request handlers.
pub struct AppServices {
    pub config: AuthConfig,
    pub users: Arc<InMemoryUserStore>,
    pub memberships: Arc<InMemoryMembershipStore>,
    pub projects: Arc<InMemoryProjectStore>,
    pub rate_limiter: Arc<RateLimiter>,
    pub hasher: Arc<PasswordHasher>,
    pub verifier: CredentialVerifier,
    pub issuer: SessionIssuer,
    pub resolver: PermissionResolver,
    pub codec: Arc<dyn TokenCodec>,
}

/// Wire the in-memory service bundle.
pub fn build_services(config: AuthConfig, jwt_secret: &[u8]) -> anyhow::Result<Arc<AppServices>> {
    config.validate().context("auth configuration rejected")?;

    let users = Arc::new(InMemoryUserStore::new());
    let memberships = Arc::new(InMemoryMembershipStore::new());
    let projects = Arc::new(InMemoryProjectStore::new());

    let hasher = Arc::new(
        PasswordHasher::new(
            config.hash_memory_kib,
            config.hash_iterations,
            config.hash_parallelism,
        )
        .context("password hasher construction failed")?,
    );

    let rate_limiter = Arc::new(RateLimiter::new(
        config.rate_limit_window,
        config.rate_limit_max_attempts,
    ));

    let lockout = LockoutTracker::new(
        users.clone() as Arc<dyn UserStore>,
        config.lockout_threshold,
        config.lockout_duration,
    );

    let issuer = SessionIssuer::new(config.session_lifetime);

    let verifier = CredentialVerifier::new(
        rate_limiter.clone(),
        lockout,
        hasher.clone(),
        users.clone() as Arc<dyn UserStore>,
        issuer.clone(),
    );

    let resolver = PermissionResolver::new(memberships.clone() as Arc<dyn MembershipStore>);

    let codec: Arc<dyn TokenCodec> = Arc::new(JwtCodec::new(jwt_secret));

    Ok(Arc::new(AppServices {
        config,
        users,
        memberships,
        projects,
        rate_limiter,
        hasher,
        verifier,
        issuer,
        resolver,
        codec,
    }))
}

impl AppServices {
    /// Provision an account with a hashed password.
    ///
    /// This is the admin/bootstrap path, not a login path: it validates
    /// shape, normalizes the email, enforces uniqueness, and stores the
    /// account with clean lockout state.
    pub async fn create_account(
        &self,
        email: &str,
        display_name: &str,
        password: &str,
        role: SystemRole,
    ) -> anyhow::Result<Account> {
        let email = Email::parse(email)?;

        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(DomainError::validation("display name cannot be empty").into());
        }
        if password.is_empty() {
            return Err(DomainError::validation("password cannot be empty").into());
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::conflict("email already in use").into());
        }

        let account = Account {
            id: AccountId::new(),
            email,
            display_name: display_name.to_string(),
            password_hash: self.hasher.hash(password)?,
            role,
            failed_attempts: 0,
            lockout_expires_at: None,
            last_login_at: None,
        };
        self.users.upsert(account.clone());

        tracing::info!(account = %account.id, role = %role, "account provisioned");
        Ok(account)
    }
}
