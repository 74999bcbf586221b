//! # Gatekeep Auth
//!
//! Access token claims and JWT utilities for the Gatekeep API.
//!
//! - [`claims`]: the claim set embedded in every access token
//! - [`jwt`]: token signing and verification
//!
//! Tokens are signed with HS256 using the process-wide secret from
//! [`gatekeep_config::JwtConfig`]. Scopes are a snapshot of the user's
//! aggregated permissions at issuance time and are not refreshed if roles
//! change afterwards.
//!
//! # Example
//!
//! ```ignore
//! use gatekeep_auth::{create_access_token, verify_token};
//! use gatekeep_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "user@example.com", application_id, scopes, &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert!(claims.has_scope("posts:read"));
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
