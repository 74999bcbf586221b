use gatekeep_core::SystemRole;
use gatekeep_core::errors::{ErrorCode, ErrorResponse};
use gatekeep_models::{
    Application, AssignRoleToUserDto, CreateApplicationDto, CreateRoleDto, CreateUserDto,
    LoginRequest, LoginResponse, MeResponse, PermissionsResponse, ProvisionedApplication, Role,
    RoleAssignment, User,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::applications::controller::create_application,
        crate::modules::applications::controller::get_applications,
        crate::modules::auth::controller::login_user,
        crate::modules::users::controller::register_user,
        crate::modules::users::controller::assign_role_to_user,
        crate::modules::users::controller::get_me,
        crate::modules::roles::controller::create_role,
        crate::modules::roles::controller::get_roles,
        crate::modules::roles::controller::get_permissions,
    ),
    components(
        schemas(
            Application,
            CreateApplicationDto,
            ProvisionedApplication,
            Role,
            CreateRoleDto,
            PermissionsResponse,
            SystemRole,
            User,
            CreateUserDto,
            AssignRoleToUserDto,
            RoleAssignment,
            LoginRequest,
            LoginResponse,
            MeResponse,
            ErrorCode,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Applications", description = "Application (tenant) bootstrap"),
        (name = "Authentication", description = "Login and token issuance"),
        (name = "Users", description = "User registration and role assignment"),
        (name = "Roles", description = "Roles and the permission registry")
    ),
    info(
        title = "Gatekeep API",
        version = "0.1.0",
        description = "Multi-tenant role-based access control built with Rust and Axum.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
