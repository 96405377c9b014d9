use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::auth::service::validate_account_fields;
use crate::utils::errors::AppError;
use crate::utils::pagination::PageParams;
use crate::utils::password::hash_password;

use super::model::{CreateStudentDto, Student};

const STUDENT_COLUMNS: &str =
    "id, first_name, last_name, email, date_of_birth, group_id, created_at";

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db))]
    pub async fn get_students(db: &PgPool, page: PageParams) -> Result<Vec<Student>, AppError> {
        let students = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students
             ORDER BY last_name, first_name
             OFFSET $1 LIMIT $2"
        ))
        .bind(page.skip())
        .bind(page.take())
        .fetch_all(db)
        .await
        .context("Failed to list students")
        .map_err(AppError::database)?;

        Ok(students)
    }

    #[instrument(skip(db))]
    pub async fn get_student_by_id(db: &PgPool, id: Uuid) -> Result<Student, AppError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch student")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Such student doesn't exist")))?;

        Ok(student)
    }

    /// Runs the same ordered field validation as registration; the row is a
    /// student by construction, so there is no role field to check.
    #[instrument(skip(db, dto))]
    pub async fn create_student(db: &PgPool, dto: CreateStudentDto) -> Result<Student, AppError> {
        validate_account_fields(
            &dto.first_name,
            &dto.last_name,
            dto.date_of_birth,
            &dto.email,
            &dto.password,
        )?;

        let password = hash_password(&dto.password)?;

        let student = sqlx::query_as::<_, Student>(&format!(
            "INSERT INTO students (first_name, last_name, email, password, date_of_birth)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.email)
        .bind(&password)
        .bind(dto.date_of_birth)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow::anyhow!(
                    "Student with email {} already exists",
                    dto.email
                ));
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        Ok(student)
    }
}
