use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, RegisterRequestDto, ResetPasswordRequest,
    Role, UserResponse, VerificationData,
};
use crate::modules::groups::model::{CreateGroupDto, Group, GroupWithStudents};
use crate::modules::students::model::{CreateStudentDto, Student};
use crate::utils::pagination::PageParams;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::verify_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::forgot_password,
        crate::modules::auth::controller::reset_password,
        crate::modules::groups::controller::get_groups,
        crate::modules::groups::controller::get_group_by_id,
        crate::modules::groups::controller::add_group,
        crate::modules::groups::controller::delete_group,
        crate::modules::groups::controller::add_student_to_group,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::create_student,
    ),
    components(
        schemas(
            Role,
            RegisterRequestDto,
            LoginRequest,
            VerificationData,
            ForgotPasswordRequest,
            ResetPasswordRequest,
            UserResponse,
            AuthResponse,
            ErrorResponse,
            Group,
            GroupWithStudents,
            CreateGroupDto,
            Student,
            CreateStudentDto,
            PageParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, verification, login and password reset"),
        (name = "Groups", description = "Group management and student assignment"),
        (name = "Students", description = "Student management endpoints")
    ),
    info(
        title = "Rollbook API",
        version = "0.1.0",
        description = "A REST API built with Rust, Axum, and PostgreSQL for managing students, teachers, and groups.",
        contact(
            name = "API Support",
            email = "support@rollbook.app"
        ),
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
