use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::utils::email::EmailService;
use crate::utils::errors::AppError;
use crate::utils::jwt::create_access_token;
use crate::utils::password::{hash_password, is_valid_password, verify_password};

use super::model::{
    AuthResponse, LoginRequest, RegisterRequestDto, ResetPasswordRequest, Role, UserResponse,
    VerificationData,
};
use super::store::{PendingRegistration, VerificationStore};

/// Row shape shared by the students and teachers tables.
#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    password: String,
    date_of_birth: DateTime<Utc>,
}

impl AccountRow {
    fn into_response(self, role: Role) -> UserResponse {
        UserResponse {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            date_of_birth: self.date_of_birth,
            role,
        }
    }
}

/// Accepts `local@domain.tld`: word characters, dots and hyphens in the
/// local part, alphanumerics, dots and hyphens in the domain, and an
/// alphabetic top-level domain of two to six letters.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    if !local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-')
    {
        return false;
    }

    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    if host.is_empty()
        || !host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return false;
    }

    let tld_len = tld.chars().count();
    (2..=6).contains(&tld_len) && tld.chars().all(|c| c.is_ascii_alphabetic())
}

/// Ordered field validation shared by registration and student creation.
/// The first failing field decides the response.
pub fn validate_account_fields(
    first_name: &str,
    last_name: &str,
    date_of_birth: DateTime<Utc>,
    email: &str,
    password: &str,
) -> Result<(), AppError> {
    if first_name.is_empty() {
        return Err(AppError::validation(
            "first_name",
            anyhow::anyhow!("First name is invalid"),
        ));
    }
    if last_name.is_empty() {
        return Err(AppError::validation(
            "last_name",
            anyhow::anyhow!("Last name is invalid"),
        ));
    }
    if date_of_birth > Utc::now() {
        return Err(AppError::validation(
            "date_of_birth",
            anyhow::anyhow!("Date of birth is invalid"),
        ));
    }
    if !is_valid_email(email) {
        return Err(AppError::validation(
            "email",
            anyhow::anyhow!("Email is invalid"),
        ));
    }
    if !is_valid_password(password) {
        return Err(AppError::validation(
            "password",
            anyhow::anyhow!("Password is invalid"),
        ));
    }
    Ok(())
}

fn parse_role(role: &str) -> Result<Role, AppError> {
    match role {
        "Student" => Ok(Role::Student),
        "Teacher" => Ok(Role::Teacher),
        _ => Err(AppError::validation(
            "role",
            anyhow::anyhow!("Role is invalid"),
        )),
    }
}

pub struct AuthService;

impl AuthService {
    /// Validates the registration, stages it under a fresh code and emails
    /// the code. Nothing touches the database until the code is claimed.
    #[instrument(skip(store, mailer, dto))]
    pub async fn register_user(
        store: &VerificationStore,
        mailer: &EmailService,
        dto: RegisterRequestDto,
    ) -> Result<(), AppError> {
        validate_account_fields(
            &dto.first_name,
            &dto.last_name,
            dto.date_of_birth,
            &dto.email,
            &dto.password,
        )?;
        let role = parse_role(&dto.role)?;

        let password = hash_password(&dto.password)?;
        let email = dto.email.clone();
        let code = store.stage_registration(PendingRegistration {
            first_name: dto.first_name,
            last_name: dto.last_name,
            email: dto.email,
            password,
            date_of_birth: dto.date_of_birth,
            role,
            created_at: Utc::now(),
        });

        mailer.send_verification_code(&email, code).await
    }

    /// Claims the pending registration for the submitted code and promotes
    /// it to a students or teachers row. Unknown code, mismatched email and
    /// expired entry all collapse into the same error.
    #[instrument(skip(db, store, jwt_config, data))]
    pub async fn verify_user(
        db: &PgPool,
        store: &VerificationStore,
        jwt_config: &JwtConfig,
        data: VerificationData,
    ) -> Result<AuthResponse, AppError> {
        let pending = store
            .claim_pending(data.code, &data.email)
            .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Code or email is incorrect")))?;

        let insert = match pending.role {
            Role::Student => {
                "INSERT INTO students (first_name, last_name, email, password, date_of_birth)
                 VALUES ($1, $2, $3, $4, $5)
                 RETURNING id, first_name, last_name, email, password, date_of_birth"
            }
            Role::Teacher => {
                "INSERT INTO teachers (first_name, last_name, email, password, date_of_birth)
                 VALUES ($1, $2, $3, $4, $5)
                 RETURNING id, first_name, last_name, email, password, date_of_birth"
            }
        };

        let result = sqlx::query_as::<_, AccountRow>(insert)
            .bind(&pending.first_name)
            .bind(&pending.last_name)
            .bind(&pending.email)
            .bind(&pending.password)
            .bind(pending.date_of_birth)
            .fetch_one(db)
            .await;

        let row = match result {
            Ok(row) => row,
            Err(e) => {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_unique_violation()
                {
                    // A retry could never succeed, the address is taken.
                    return Err(AppError::bad_request(anyhow::anyhow!(
                        "Email is already registered"
                    )));
                }
                // Transient failure: put the entry back so the same code
                // stays claimable for another attempt.
                store.restage(data.code, pending);
                return Err(AppError::database(anyhow::Error::from(e)));
            }
        };

        let token = create_access_token(pending.role, jwt_config)?;
        Ok(AuthResponse {
            user: row.into_response(pending.role),
            token,
        })
    }

    /// Students are tried before teachers; unknown email and wrong password
    /// produce the same error.
    #[instrument(skip(db, jwt_config, dto))]
    pub async fn login_user(
        db: &PgPool,
        jwt_config: &JwtConfig,
        dto: LoginRequest,
    ) -> Result<AuthResponse, AppError> {
        for role in [Role::Student, Role::Teacher] {
            let Some(account) = Self::find_account(db, role, &dto.email).await? else {
                continue;
            };
            if verify_password(&dto.password, &account.password)? {
                let token = create_access_token(role, jwt_config)?;
                return Ok(AuthResponse {
                    user: account.into_response(role),
                    token,
                });
            }
        }
        Err(AppError::bad_request(anyhow::anyhow!(
            "Invalid email or password"
        )))
    }

    /// Issues a reset code for a registered email, replacing any code still
    /// outstanding, and mails it. The code also travels in the response.
    #[instrument(skip(db, store, mailer))]
    pub async fn generate_reset_code(
        db: &PgPool,
        store: &VerificationStore,
        mailer: &EmailService,
        email: String,
    ) -> Result<VerificationData, AppError> {
        let student = Self::find_account(db, Role::Student, &email).await?;
        let teacher = if student.is_none() {
            Self::find_account(db, Role::Teacher, &email).await?
        } else {
            None
        };
        if student.is_none() && teacher.is_none() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "email not registered"
            )));
        }

        let code = store.issue_reset_code(&email);
        mailer.send_password_reset_code(&email, code).await?;

        Ok(VerificationData { email, code })
    }

    /// Checks run in order: outstanding request, code match, password
    /// policy. The stored password only changes after all three pass, and
    /// the code is cleared last.
    #[instrument(skip(db, store, dto))]
    pub async fn reset_password(
        db: &PgPool,
        store: &VerificationStore,
        dto: ResetPasswordRequest,
    ) -> Result<(), AppError> {
        let Some(expected) = store.reset_code(&dto.email) else {
            return Err(AppError::bad_request(anyhow::anyhow!("Wrong email")));
        };
        if expected != dto.code {
            return Err(AppError::bad_request(anyhow::anyhow!("Wrong code")));
        }
        if !is_valid_password(&dto.new_password) {
            return Err(AppError::validation(
                "new_password",
                anyhow::anyhow!("Password is invalid"),
            ));
        }

        let password = hash_password(&dto.new_password)?;

        let updated = sqlx::query("UPDATE students SET password = $1 WHERE email = $2")
            .bind(&password)
            .bind(&dto.email)
            .execute(db)
            .await
            .context("Failed to update student password")
            .map_err(AppError::database)?;

        if updated.rows_affected() == 0 {
            let updated = sqlx::query("UPDATE teachers SET password = $1 WHERE email = $2")
                .bind(&password)
                .bind(&dto.email)
                .execute(db)
                .await
                .context("Failed to update teacher password")
                .map_err(AppError::database)?;

            if updated.rows_affected() == 0 {
                // A live reset code implies the account exists.
                return Err(AppError::internal(anyhow::anyhow!(
                    "account for outstanding reset code not found"
                )));
            }
        }

        store.clear_reset_code(&dto.email);
        Ok(())
    }

    async fn find_account(
        db: &PgPool,
        role: Role,
        email: &str,
    ) -> Result<Option<AccountRow>, AppError> {
        let query = match role {
            Role::Student => {
                "SELECT id, first_name, last_name, email, password, date_of_birth
                 FROM students WHERE email = $1"
            }
            Role::Teacher => {
                "SELECT id, first_name, last_name, email, password, date_of_birth
                 FROM teachers WHERE email = $1"
            }
        };

        let account = sqlx::query_as::<_, AccountRow>(query)
            .bind(email)
            .fetch_optional(db)
            .await
            .context("Failed to look up account by email")
            .map_err(AppError::database)?;

        Ok(account)
    }
}
