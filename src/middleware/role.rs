//! Role-gating extractors.
//!
//! Routes that accept any signed-in account take [`RequireMember`]; routes
//! reserved for teachers take [`RequireTeacher`]. Both wrap the
//! [`AuthUser`] extractor, so a missing or invalid token is a 401 and a
//! valid token with the wrong role is a 403.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::middleware::auth::AuthUser;
use crate::modules::auth::model::Role;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Any authenticated account, Student or Teacher.
#[derive(Debug, Clone)]
pub struct RequireMember(pub AuthUser);

impl FromRequestParts<AppState> for RequireMember {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireMember(auth_user))
    }
}

/// Teacher accounts only.
#[derive(Debug, Clone)]
pub struct RequireTeacher(pub AuthUser);

impl FromRequestParts<AppState> for RequireTeacher {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;

        if auth_user.role() != Role::Teacher {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "Access denied. Teacher privileges required."
            )));
        }

        Ok(RequireTeacher(auth_user))
    }
}
