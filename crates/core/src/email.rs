//! Case-normalized email address.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Normalized email address (trimmed, lowercased).
///
/// Email is the account identity root, so normalization lives in exactly one
/// place: here. Two addresses that differ only in case or surrounding
/// whitespace identify the same account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Parse and normalize a raw address.
    ///
    /// Rejects empty input and addresses without an `@`. Anything beyond the
    /// basic shape check is the mail system's problem, not ours.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(DomainError::validation("email cannot be empty"));
        }
        if !normalized.contains('@') {
            return Err(DomainError::validation("invalid email format"));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Email {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        let email = Email::parse("  Alice@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
    }

    #[test]
    fn equal_after_normalization() {
        let a = Email::parse("bob@example.com").unwrap();
        let b = Email::parse("BOB@example.com").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_empty() {
        assert!(Email::parse("   ").is_err());
    }

    #[test]
    fn rejects_missing_at() {
        assert!(Email::parse("not-an-email").is_err());
    }
}
