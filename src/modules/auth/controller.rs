use axum::Json;
use axum::extract::State;
use tracing::instrument;
use utoipa::ToSchema;

use crate::state::AppState;
use crate::utils::email::EmailService;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, RegisterRequestDto, ResetPasswordRequest,
    VerificationData,
};
use super::service::AuthService;

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Register a new user and email a verification code
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 200, description = "Registration staged, verification code emailed"),
        (status = 400, description = "Bad request - validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequestDto>,
) -> Result<(), AppError> {
    let mailer = EmailService::new(state.email_config.clone());
    AuthService::register_user(&state.verification, &mailer, dto).await
}

/// Confirm a verification code and create the account
#[utoipa::path(
    post,
    path = "/auth/verifyUser",
    request_body = VerificationData,
    responses(
        (status = 200, description = "Account created", body = AuthResponse),
        (status = 400, description = "Code or email is incorrect", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, data))]
pub async fn verify_user(
    State(state): State<AppState>,
    ValidatedJson(data): ValidatedJson<VerificationData>,
) -> Result<Json<AuthResponse>, AppError> {
    let response =
        AuthService::verify_user(&state.db, &state.verification, &state.jwt_config, data).await?;
    Ok(Json(response))
}

/// Login and receive a JWT token
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Invalid email or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = AuthService::login_user(&state.db, &state.jwt_config, dto).await?;
    Ok(Json(response))
}

/// Request a password reset code
#[utoipa::path(
    post,
    path = "/auth/forgot_password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset code issued and emailed", body = VerificationData),
        (status = 400, description = "Email not registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state))]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ForgotPasswordRequest>,
) -> Result<Json<VerificationData>, AppError> {
    let mailer = EmailService::new(state.email_config.clone());
    let data =
        AuthService::generate_reset_code(&state.db, &state.verification, &mailer, dto.email)
            .await?;
    Ok(Json(data))
}

/// Reset the password using an emailed code
#[utoipa::path(
    patch,
    path = "/auth/reset_password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset"),
        (status = 400, description = "Wrong code, wrong email or weak password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ResetPasswordRequest>,
) -> Result<(), AppError> {
    AuthService::reset_password(&state.db, &state.verification, dto).await
}
