//! Permission registry for the Gatekeep API.
//!
//! Permissions form a closed, versioned set of strings. Roles may only be
//! built from registered permissions; membership is checked when a role is
//! written, never when a token is checked.
//!
//! The registry is plain immutable data. It is built once at startup and
//! shared through application state.
//!
//! # Example
//!
//! ```ignore
//! use gatekeep_core::permissions::{self, PermissionRegistry, SystemRole};
//!
//! let registry = PermissionRegistry::default();
//! assert!(registry.contains(permissions::POSTS_READ));
//! assert_eq!(SystemRole::SuperAdmin.name(), "SUPER_ADMIN");
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Version of the permission set below. Bump when a permission is added or removed.
pub const REGISTRY_VERSION: u32 = 1;

// =============================================================================
// Users permissions
// =============================================================================

/// Permission to assign roles to users
pub const USERS_ROLES_WRITE: &str = "users:roles:write";
/// Permission to remove roles from users
pub const USERS_ROLES_DELETE: &str = "users:roles:delete";

// =============================================================================
// Roles permissions
// =============================================================================

/// Permission to create roles
pub const ROLES_WRITE: &str = "roles:write";

// =============================================================================
// Posts permissions
// =============================================================================

/// Permission to create posts
pub const POSTS_WRITE: &str = "posts:write";
/// Permission to read posts
pub const POSTS_READ: &str = "posts:read";
/// Permission to delete posts
pub const POSTS_DELETE: &str = "posts:delete";
/// Permission to update posts
pub const POSTS_UPDATE: &str = "posts:update";

/// Every registered permission.
pub const ALL_PERMISSIONS: [&str; 7] = [
    USERS_ROLES_WRITE,
    USERS_ROLES_DELETE,
    ROLES_WRITE,
    POSTS_WRITE,
    POSTS_READ,
    POSTS_DELETE,
    POSTS_UPDATE,
];

/// Permissions granted to the default application user role.
pub const USER_ROLE_PERMISSIONS: [&str; 2] = [POSTS_WRITE, POSTS_READ];

/// The two roles provisioned for every application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemRole {
    SuperAdmin,
    ApplicationUser,
}

impl SystemRole {
    pub const ALL: [SystemRole; 2] = [SystemRole::SuperAdmin, SystemRole::ApplicationUser];

    /// The role name as stored per application.
    pub const fn name(&self) -> &'static str {
        match self {
            SystemRole::SuperAdmin => "SUPER_ADMIN",
            SystemRole::ApplicationUser => "APPLICATION_USER",
        }
    }

    /// Role a newly registered user receives.
    pub const fn for_registration(initial_user: bool) -> Self {
        if initial_user {
            SystemRole::SuperAdmin
        } else {
            SystemRole::ApplicationUser
        }
    }
}

impl std::fmt::Display for SystemRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission: {0}")]
pub struct UnknownPermission(pub String);

/// The closed set of valid permissions plus the default non-admin subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRegistry {
    version: u32,
    all: BTreeSet<String>,
    defaults: BTreeSet<String>,
}

impl PermissionRegistry {
    /// Builds a registry. Every default permission must itself be registered.
    pub fn new<'a>(
        version: u32,
        all: impl IntoIterator<Item = &'a str>,
        defaults: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, UnknownPermission> {
        let all: BTreeSet<String> = all.into_iter().map(str::to_string).collect();
        let defaults: BTreeSet<String> = defaults.into_iter().map(str::to_string).collect();

        if let Some(stray) = defaults.iter().find(|p| !all.contains(*p)) {
            return Err(UnknownPermission(stray.clone()));
        }

        Ok(Self {
            version,
            all,
            defaults,
        })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn contains(&self, permission: &str) -> bool {
        self.all.contains(permission)
    }

    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.all.iter().map(String::as_str)
    }

    pub fn defaults(&self) -> impl Iterator<Item = &str> {
        self.defaults.iter().map(String::as_str)
    }

    /// Permissions a system role is provisioned with.
    pub fn permissions_for(&self, role: SystemRole) -> Vec<String> {
        match role {
            SystemRole::SuperAdmin => self.all.iter().cloned().collect(),
            SystemRole::ApplicationUser => self.defaults.iter().cloned().collect(),
        }
    }

    /// Rejects the first permission that is not registered.
    pub fn validate<'a>(
        &self,
        permissions: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), UnknownPermission> {
        match permissions.into_iter().find(|p| !self.contains(p)) {
            Some(unknown) => Err(UnknownPermission(unknown.to_string())),
            None => Ok(()),
        }
    }
}

impl Default for PermissionRegistry {
    fn default() -> Self {
        Self {
            version: REGISTRY_VERSION,
            all: ALL_PERMISSIONS.iter().map(|p| p.to_string()).collect(),
            defaults: USER_ROLE_PERMISSIONS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_seven_permissions() {
        let registry = PermissionRegistry::default();
        assert_eq!(registry.all().count(), 7);
        assert_eq!(registry.version(), REGISTRY_VERSION);
    }

    #[test]
    fn test_defaults_are_strict_subset() {
        let registry = PermissionRegistry::default();
        let all: BTreeSet<&str> = registry.all().collect();
        let defaults: BTreeSet<&str> = registry.defaults().collect();
        assert!(defaults.is_subset(&all));
        assert!(defaults.len() < all.len());
    }

    #[test]
    fn test_permissions_for_system_roles() {
        let registry = PermissionRegistry::default();
        assert_eq!(registry.permissions_for(SystemRole::SuperAdmin).len(), 7);

        let user = registry.permissions_for(SystemRole::ApplicationUser);
        assert_eq!(user.len(), 2);
        assert!(user.contains(&POSTS_WRITE.to_string()));
        assert!(user.contains(&POSTS_READ.to_string()));
    }

    #[test]
    fn test_validate_rejects_unknown() {
        let registry = PermissionRegistry::default();
        assert!(registry.validate([POSTS_READ, ROLES_WRITE]).is_ok());
        assert_eq!(
            registry.validate([POSTS_READ, "posts:publish"]),
            Err(UnknownPermission("posts:publish".to_string()))
        );
    }

    #[test]
    fn test_validate_empty_is_ok() {
        let registry = PermissionRegistry::default();
        assert!(registry.validate(Vec::<&str>::new()).is_ok());
    }

    #[test]
    fn test_new_rejects_defaults_outside_registry() {
        let result = PermissionRegistry::new(2, ["a:read"], ["a:read", "b:read"]);
        assert_eq!(result, Err(UnknownPermission("b:read".to_string())));
    }

    #[test]
    fn test_system_role_names() {
        assert_eq!(SystemRole::SuperAdmin.name(), "SUPER_ADMIN");
        assert_eq!(SystemRole::ApplicationUser.name(), "APPLICATION_USER");
        assert_eq!(
            serde_json::to_string(&SystemRole::ApplicationUser).unwrap(),
            r#""APPLICATION_USER""#
        );
    }

    #[test]
    fn test_role_for_registration() {
        assert_eq!(SystemRole::for_registration(true), SystemRole::SuperAdmin);
        assert_eq!(
            SystemRole::for_registration(false),
            SystemRole::ApplicationUser
        );
    }
}
