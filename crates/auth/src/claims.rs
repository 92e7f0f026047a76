use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::PrincipalId;

/// JWT claims model (transport-agnostic).
///
/// The minimal set of claims expected once a token has been decoded and its
/// signature verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject / principal identifier.
    pub sub: PrincipalId,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate JWT claims.
///
/// Validates the *claims* only; signature verification happens in
/// [`crate::jwt`].
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_time() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn claims(issued: i64, expires: i64) -> JwtClaims {
        JwtClaims {
            sub: PrincipalId::new(),
            issued_at: test_time() + Duration::minutes(issued),
            expires_at: test_time() + Duration::minutes(expires),
        }
    }

    #[test]
    fn accepts_current_window() {
        assert_eq!(validate_claims(&claims(-5, 5), test_time()), Ok(()));
    }

    #[test]
    fn rejects_expired_future_and_inverted() {
        assert_eq!(
            validate_claims(&claims(-10, 0), test_time()),
            Err(TokenValidationError::Expired)
        );
        assert_eq!(
            validate_claims(&claims(1, 10), test_time()),
            Err(TokenValidationError::NotYetValid)
        );
        assert_eq!(
            validate_claims(&claims(5, 5), test_time()),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }
}
