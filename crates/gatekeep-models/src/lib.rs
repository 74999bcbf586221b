//! # Gatekeep Models
//!
//! Domain entities and DTOs for the Gatekeep API.
//!
//! # Modules
//!
//! - [`ids`]: strongly-typed identifiers
//! - [`applications`]: applications (tenants) and the bootstrap result
//! - [`roles`]: tenant-scoped roles and the permission listing
//! - [`users`]: users, role assignments and the permission-aggregation rows
//! - [`auth`]: login request/response
//!
//! Every role, user and assignment carries the [`ApplicationId`] of the tenant
//! that owns it.

pub mod applications;
pub mod auth;
pub mod ids;
pub mod roles;
pub mod users;

// Re-export commonly used types at crate root for convenience
pub use applications::{Application, CreateApplicationDto, ProvisionedApplication};
pub use auth::{Claims, LoginRequest, LoginResponse, MeResponse};
pub use ids::{ApplicationId, RoleId, UserId};
pub use roles::{CreateRoleDto, NewRole, PermissionsResponse, Role};
pub use users::{
    AssignRoleToUserDto, CreateUserDto, NewUser, ResolvedUser, RoleAssignment, User, UserRoleRow,
};
