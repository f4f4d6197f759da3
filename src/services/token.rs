//! Signed bearer tokens (HS256 JWT).
//!
//! Expiry is checked here against an explicit clock reading rather than by
//! the decoder, so tests can pin the time.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Role;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token is malformed or has a bad signature")]
    Invalid,

    #[error("Token has expired")]
    Expired,

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Identity decoded from a verified token, attached to the request by the
/// auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
    pub role: Role,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
        }
    }
}

pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenSigner {
    #[must_use]
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn issue(&self, user_id: &str, role: Role) -> Result<String, TokenError> {
        self.issue_at(user_id, role, Utc::now())
    }

    pub fn issue_at(
        &self,
        user_id: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// A token is accepted while `now < exp`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| TokenError::Invalid)?
            .claims;

        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn signer() -> TokenSigner {
        TokenSigner::new(b"test-secret", Duration::hours(1))
    }

    #[test]
    fn test_token_lifetime_is_one_hour() {
        let signer = signer();
        let issued = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let token = signer.issue_at("user-1", Role::Player, issued).unwrap();

        let claims = signer
            .verify_at(&token, issued + Duration::minutes(59))
            .unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.role, Role::Player);
        assert_eq!(claims.exp - claims.iat, 3600);

        assert_eq!(
            signer.verify_at(&token, issued + Duration::minutes(61)),
            Err(TokenError::Expired)
        );
        assert_eq!(
            signer.verify_at(&token, issued + Duration::hours(1)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = signer().issue("user-1", Role::Manager).unwrap();
        let other = TokenSigner::new(b"other-secret", Duration::hours(1));
        assert_eq!(other.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let signer = signer();
        assert_eq!(signer.verify(""), Err(TokenError::Invalid));
        assert_eq!(signer.verify("not.a.token"), Err(TokenError::Invalid));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let signer = signer();
        let token = signer.issue("user-1", Role::Player).unwrap();
        let forged = signer.issue("user-1", Role::Manager).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

        assert_eq!(signer.verify(&spliced), Err(TokenError::Invalid));
    }
}
