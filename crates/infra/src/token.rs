//! HS256 session token codec.

use chrono::{TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use taskhub_auth::{SessionClaim, SystemRole, TokenCodec, TokenError};
use taskhub_core::{AccountId, Email};

/// Wire form of a session claim (registered JWT claim names where they
/// exist).
#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: AccountId,
    email: Email,
    name: String,
    role: SystemRole,
    iat: i64,
    exp: i64,
}

/// HS256-signed, tamper-evident session tokens.
///
/// Decode failures are collapsed to `Invalid`/`Expired`; callers get no
/// detail about why a token was rejected.
pub struct JwtCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // The claim window is exact; no clock slack on top of it.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl TokenCodec for JwtCodec {
    fn encode(&self, claim: &SessionClaim) -> Result<String, TokenError> {
        let wire = WireClaims {
            sub: claim.account_id,
            email: claim.email.clone(),
            name: claim.display_name.clone(),
            role: claim.role,
            iat: claim.issued_at.timestamp(),
            exp: claim.expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &wire, &self.encoding)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    fn decode(&self, token: &str) -> Result<SessionClaim, TokenError> {
        let data =
            decode::<WireClaims>(token, &self.decoding, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Invalid,
                }
            })?;

        let wire = data.claims;
        let issued_at = Utc
            .timestamp_opt(wire.iat, 0)
            .single()
            .ok_or(TokenError::Invalid)?;
        let expires_at = Utc
            .timestamp_opt(wire.exp, 0)
            .single()
            .ok_or(TokenError::Invalid)?;

        Ok(SessionClaim {
            account_id: wire.sub,
            email: wire.email,
            display_name: wire.name,
            role: wire.role,
            issued_at,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration};

    use super::*;

    fn claim(issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> SessionClaim {
        SessionClaim {
            account_id: AccountId::new(),
            email: Email::parse("grace@example.com").unwrap(),
            display_name: "Grace".to_string(),
            role: SystemRole::Admin,
            issued_at,
            expires_at,
        }
    }

    /// Claims carry sub-second precision the wire format drops; compare at
    /// second granularity.
    fn truncated(claim: &SessionClaim) -> SessionClaim {
        SessionClaim {
            issued_at: Utc.timestamp_opt(claim.issued_at.timestamp(), 0).unwrap(),
            expires_at: Utc.timestamp_opt(claim.expires_at.timestamp(), 0).unwrap(),
            ..claim.clone()
        }
    }

    #[test]
    fn encode_decode_round_trip() {
        let codec = JwtCodec::new(b"test-secret");
        let now = Utc::now();
        let original = claim(now, now + Duration::hours(24));

        let token = codec.encode(&original).unwrap();
        let decoded = codec.decode(&token).unwrap();
        assert_eq!(decoded, truncated(&original));
    }

    #[test]
    fn expired_token_is_rejected_as_expired() {
        let codec = JwtCodec::new(b"test-secret");
        let past = Utc::now() - Duration::hours(48);
        let token = codec.encode(&claim(past, past + Duration::hours(24))).unwrap();

        assert_eq!(codec.decode(&token), Err(TokenError::Expired));
    }

    #[test]
    fn wrong_secret_is_invalid_not_expired() {
        let codec = JwtCodec::new(b"test-secret");
        let other = JwtCodec::new(b"other-secret");
        let now = Utc::now();
        let token = codec.encode(&claim(now, now + Duration::hours(24))).unwrap();

        assert_eq!(other.decode(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn garbage_is_invalid() {
        let codec = JwtCodec::new(b"test-secret");
        assert_eq!(codec.decode("not-a-token"), Err(TokenError::Invalid));
    }
}
