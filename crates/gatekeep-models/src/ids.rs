//! Strongly-typed ID newtypes for domain entities.
//!
//! Each entity gets its own wrapper around `Uuid`, so an `ApplicationId` can
//! never be passed where a `UserId` is expected.
//!
//! # Example
//!
//! ```ignore
//! use gatekeep_models::ids::{ApplicationId, UserId};
//!
//! fn list_users(application_id: ApplicationId) { /* ... */ }
//!
//! let application_id = ApplicationId::new();
//! list_users(application_id);       // OK
//! // list_users(UserId::new());     // Compile error! Type mismatch.
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
            sqlx::Type,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        #[schema(value_type = String, format = "uuid")]
        pub struct $name(pub Uuid);

        impl $name {
            /// A fresh random (v4) id.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

define_id!(
    /// Identifies a tenant.
    ApplicationId
);
define_id!(RoleId);
define_id!(UserId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = UserId::from_uuid(uuid);
        assert_eq!(id.into_inner(), uuid);
    }

    #[test]
    fn test_ids_are_random() {
        assert_ne!(ApplicationId::new(), ApplicationId::new());
    }

    #[test]
    fn test_id_debug() {
        let id = ApplicationId::from_uuid(Uuid::from_u128(0x12345678_1234_1234_1234_123456789abc));
        let debug = format!("{:?}", id);
        assert_eq!(debug, "ApplicationId(12345678-1234-1234-1234-123456789abc)");
    }

    #[test]
    fn test_id_from_str() {
        let id: RoleId = "12345678-1234-1234-1234-123456789abc".parse().unwrap();
        assert_eq!(
            id.into_inner(),
            Uuid::from_u128(0x12345678_1234_1234_1234_123456789abc)
        );
        assert!("not-a-uuid".parse::<RoleId>().is_err());
    }

    #[test]
    fn test_id_serde_is_transparent() {
        let id = UserId::from_uuid(Uuid::from_u128(0x12345678_1234_1234_1234_123456789abc));
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""12345678-1234-1234-1234-123456789abc""#);

        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
