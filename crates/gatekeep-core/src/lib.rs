//! # Gatekeep Core
//!
//! Core types shared by every Gatekeep crate.
//!
//! - [`errors`]: the application error type, its client-facing codes and HTTP rendering
//! - [`permissions`]: the closed permission registry and the two system role names
//! - [`password`]: the credential store used to hash and verify user passwords
//!
//! # Example
//!
//! ```ignore
//! use gatekeep_core::{AppError, PermissionRegistry, SystemRole};
//!
//! let registry = PermissionRegistry::default();
//! let defaults = registry.permissions_for(SystemRole::ApplicationUser);
//! assert!(registry.validate(defaults.iter().map(String::as_str)).is_ok());
//! ```

pub mod errors;
pub mod password;
pub mod permissions;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorCode};
pub use password::{BcryptCredentialStore, CredentialError, CredentialStore};
pub use permissions::{PermissionRegistry, SystemRole, UnknownPermission};
