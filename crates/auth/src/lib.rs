//! `stockroom-auth`: bearer-token authentication boundary.
//!
//! Decoupled from HTTP and storage: the API layer hands in a raw token and gets
//! back validated claims naming the acting user.

pub mod claims;
pub mod jwt;
pub mod principal;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtError, JwtValidator};
pub use principal::PrincipalId;
