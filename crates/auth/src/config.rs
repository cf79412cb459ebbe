//! Authentication configuration surface.

use chrono::Duration;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Every tunable of the auth core, with production defaults.
///
/// Constructed once at process start and validated before any component is
/// wired from it; there is deliberately no dynamic config map anywhere in
/// the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Rate-limit window per source key.
    pub rate_limit_window: Duration,

    /// Attempts admitted per source key per window.
    pub rate_limit_max_attempts: u32,

    /// Failed attempts before an account locks.
    pub lockout_threshold: u32,

    /// How long a locked account stays locked.
    pub lockout_duration: Duration,

    /// Session claim lifetime. Renewal opens once more than half of it has
    /// elapsed.
    pub session_lifetime: Duration,

    /// Argon2 memory cost in KiB.
    pub hash_memory_kib: u32,

    /// Argon2 iteration count.
    pub hash_iterations: u32,

    /// Argon2 lane count.
    pub hash_parallelism: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            rate_limit_window: Duration::minutes(5),
            rate_limit_max_attempts: 5,
            lockout_threshold: 10,
            lockout_duration: Duration::hours(1),
            session_lifetime: Duration::hours(24),
            hash_memory_kib: 19_456,
            hash_iterations: 2,
            hash_parallelism: 1,
        }
    }
}

impl AuthConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_limit_window <= Duration::zero() {
            return Err(ConfigError::Invalid("rate_limit_window must be positive"));
        }
        if self.rate_limit_max_attempts == 0 {
            return Err(ConfigError::Invalid("rate_limit_max_attempts must be at least 1"));
        }
        if self.lockout_threshold == 0 {
            return Err(ConfigError::Invalid("lockout_threshold must be at least 1"));
        }
        if self.lockout_duration <= Duration::zero() {
            return Err(ConfigError::Invalid("lockout_duration must be positive"));
        }
        if self.session_lifetime <= Duration::zero() {
            return Err(ConfigError::Invalid("session_lifetime must be positive"));
        }
        if self.hash_memory_kib < 8 {
            return Err(ConfigError::Invalid("hash_memory_kib must be at least 8"));
        }
        if self.hash_iterations == 0 {
            return Err(ConfigError::Invalid("hash_iterations must be at least 1"));
        }
        if self.hash_parallelism == 0 {
            return Err(ConfigError::Invalid("hash_parallelism must be at least 1"));
        }
        Ok(())
    }
}
