use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::students::model::Student;
use crate::utils::errors::AppError;

use super::model::{CreateGroupDto, Group, GroupFilterParams, GroupWithStudents};

/// Escapes `%`, `_` and `\` so a search fragment matches literally inside
/// an ILIKE pattern.
fn escape_like(fragment: &str) -> String {
    fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

pub struct GroupService;

impl GroupService {
    /// Lists groups ordered by name, optionally narrowed to names containing
    /// the search fragment. `skip` applies before `take`; a skip past the end
    /// yields an empty list.
    #[instrument(skip(db))]
    pub async fn get_groups(
        db: &PgPool,
        filters: GroupFilterParams,
    ) -> Result<Vec<Group>, AppError> {
        let skip = filters.pagination.skip();
        let take = filters.pagination.take();

        let groups = match filters.name.as_deref().filter(|n| !n.is_empty()) {
            Some(name) => {
                sqlx::query_as::<_, Group>(
                    "SELECT id, name, created_at FROM groups
                     WHERE name ILIKE $1
                     ORDER BY name ASC
                     OFFSET $2 LIMIT $3",
                )
                .bind(format!("%{}%", escape_like(name)))
                .bind(skip)
                .bind(take)
                .fetch_all(db)
                .await
            }
            None => {
                sqlx::query_as::<_, Group>(
                    "SELECT id, name, created_at FROM groups
                     ORDER BY name ASC
                     OFFSET $1 LIMIT $2",
                )
                .bind(skip)
                .bind(take)
                .fetch_all(db)
                .await
            }
        }
        .context("Failed to list groups")
        .map_err(AppError::database)?;

        Ok(groups)
    }

    /// Absence is a valid result here; the controller decides what a miss
    /// means for its status code.
    #[instrument(skip(db))]
    pub async fn get_group_by_id(
        db: &PgPool,
        id: Uuid,
    ) -> Result<Option<GroupWithStudents>, AppError> {
        let group = sqlx::query_as::<_, Group>(
            "SELECT id, name, created_at FROM groups WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch group")
        .map_err(AppError::database)?;

        let Some(group) = group else {
            return Ok(None);
        };

        let students = sqlx::query_as::<_, Student>(
            "SELECT id, first_name, last_name, email, date_of_birth, group_id, created_at
             FROM students
             WHERE group_id = $1
             ORDER BY last_name, first_name",
        )
        .bind(id)
        .fetch_all(db)
        .await
        .context("Failed to fetch group students")
        .map_err(AppError::database)?;

        Ok(Some(GroupWithStudents {
            id: group.id,
            name: group.name,
            created_at: group.created_at,
            students,
        }))
    }

    #[instrument(skip(db))]
    pub async fn add_group(db: &PgPool, dto: CreateGroupDto) -> Result<Group, AppError> {
        let group = sqlx::query_as::<_, Group>(
            "INSERT INTO groups (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(&dto.name)
        .fetch_one(db)
        .await
        .context("Failed to create group")
        .map_err(AppError::database)?;

        Ok(group)
    }

    /// Enrolled students are detached by the store (`ON DELETE SET NULL`),
    /// never deleted with the group.
    #[instrument(skip(db))]
    pub async fn delete_group(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete group")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Such group doesn't exist"
            )));
        }

        Ok(())
    }

    /// Points the student's group reference at `group_id`. The foreign key
    /// rejects a group that doesn't exist, so the existence check cannot
    /// race a concurrent group deletion.
    #[instrument(skip(db))]
    pub async fn add_student_to_group(
        db: &PgPool,
        group_id: Uuid,
        student_id: Uuid,
    ) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE students SET group_id = $1 WHERE id = $2")
            .bind(group_id)
            .bind(student_id)
            .execute(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_foreign_key_violation()
                {
                    return AppError::bad_request(anyhow::anyhow!("Such group doesn't exist"));
                }
                AppError::database(anyhow::Error::from(e))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Such student doesn't exist"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_passes_plain_text() {
        assert_eq!(escape_like("Math"), "Math");
    }

    #[test]
    fn test_escape_like_escapes_wildcards() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_escape_like_backslash_before_wildcards() {
        // A literal `\%` must come out as `\\\%`, not `\\%`.
        assert_eq!(escape_like("\\%"), "\\\\\\%");
    }
}
