//! `taskhub-auth` — authentication and access-control core.
//!
//! Credential verification, brute-force mitigation (per-source rate limiting
//! and per-account lockout), session-claim issuance, and role/permission
//! resolution. This crate is intentionally decoupled from HTTP and storage:
//! the user/membership stores and the token codec are trait seams implemented
//! elsewhere.

pub mod claims;
pub mod config;
pub mod lockout;
pub mod password;
pub mod permissions;
pub mod rate_limit;
pub mod resolver;
pub mod roles;
pub mod session;
pub mod store;
pub mod verifier;

pub use claims::{ClaimError, SessionClaim, validate_claim};
pub use config::{AuthConfig, ConfigError};
pub use lockout::LockoutTracker;
pub use password::{PasswordHashError, PasswordHasher};
pub use permissions::{Capabilities, ProjectAction, capabilities_for, project_role_allows};
pub use rate_limit::RateLimiter;
pub use resolver::PermissionResolver;
pub use roles::{ProjectRole, SystemRole};
pub use session::{SessionIssuer, TokenCodec, TokenError};
pub use store::{Account, MembershipStore, StoreError, UserStore};
pub use verifier::{AuthError, AuthFailure, CredentialVerifier};
