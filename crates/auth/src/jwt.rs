//! HS256 bearer token verification.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use thiserror::Error;

use crate::claims::{JwtClaims, TokenValidationError, validate_claims};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JwtError {
    #[error("malformed or badly signed token: {0}")]
    Decode(String),

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// Turns a raw bearer token into validated claims.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, JwtError>;
}

/// Shared-secret HS256 validator.
///
/// Expiry is carried in `expires_at` (RFC 3339), so the registered `exp` claim
/// is not required; time checks go through [`validate_claims`].
pub struct Hs256JwtValidator {
    key: DecodingKey,
    validation: Validation,
}

impl Hs256JwtValidator {
    pub fn new(secret: Vec<u8>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = false;
        Self {
            key: DecodingKey::from_secret(&secret),
            validation,
        }
    }
}

impl core::fmt::Debug for Hs256JwtValidator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256JwtValidator").finish_non_exhaustive()
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, JwtError> {
        let data = decode::<JwtClaims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "rejected bearer token");
            JwtError::Decode(e.to_string())
        })?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PrincipalId;
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn mint(secret: &str, claims: &JwtClaims) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn fresh_claims() -> JwtClaims {
        let now = Utc::now();
        JwtClaims {
            sub: PrincipalId::new(),
            issued_at: now - Duration::minutes(1),
            expires_at: now + Duration::minutes(10),
        }
    }

    #[test]
    fn round_trips_signed_claims() {
        let claims = fresh_claims();
        let token = mint("s3cret", &claims);
        let validator = Hs256JwtValidator::new(b"s3cret".to_vec());
        assert_eq!(validator.validate(&token, Utc::now()), Ok(claims));
    }

    #[test]
    fn rejects_wrong_secret_and_garbage() {
        let token = mint("s3cret", &fresh_claims());
        let validator = Hs256JwtValidator::new(b"other".to_vec());
        assert!(matches!(validator.validate(&token, Utc::now()), Err(JwtError::Decode(_))));
        assert!(matches!(validator.validate("not.a.jwt", Utc::now()), Err(JwtError::Decode(_))));
    }

    #[test]
    fn rejects_expired_claims() {
        let claims = fresh_claims();
        let token = mint("s3cret", &claims);
        let validator = Hs256JwtValidator::new(b"s3cret".to_vec());
        let later = claims.expires_at + Duration::seconds(1);
        assert_eq!(
            validator.validate(&token, later),
            Err(JwtError::Claims(TokenValidationError::Expired))
        );
    }
}
