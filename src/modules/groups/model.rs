use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::students::model::Student;

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A group with the students currently enrolled in it, i.e. the students
/// whose `group_id` points at it.
#[derive(Debug, Serialize, ToSchema)]
pub struct GroupWithStudents {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub students: Vec<Student>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGroupDto {
    #[validate(length(min = 1, message = "Group name is required"))]
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct GroupFilterParams {
    /// Substring to match against group names, case-insensitive.
    pub name: Option<String>,
    #[serde(flatten)]
    pub pagination: crate::utils::pagination::PageParams,
}
