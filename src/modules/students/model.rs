use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Student row as exposed over the API. The password hash is never
/// selected into this shape.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: DateTime<Utc>,
    pub group_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Creation request. Field checks run in the same fixed order as
/// registration, so the derive carries no rules of its own.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub date_of_birth: DateTime<Utc>,
}
