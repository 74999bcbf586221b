pub mod applications;
pub mod auth;
pub mod roles;
pub mod users;
