use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::Json;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::role::{RequireMember, RequireTeacher};
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{CreateGroupDto, Group, GroupFilterParams, GroupWithStudents};
use super::service::GroupService;

/// List groups, filtered by name substring and paginated
#[utoipa::path(
    get,
    path = "/groups",
    params(GroupFilterParams),
    responses(
        (status = 200, description = "List of groups ordered by name", body = Vec<Group>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Groups",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_groups(
    State(state): State<AppState>,
    _member: RequireMember,
    Query(filters): Query<GroupFilterParams>,
) -> Result<Json<Vec<Group>>, AppError> {
    let groups = GroupService::get_groups(&state.db, filters).await?;
    Ok(Json(groups))
}

/// Get a group and its enrolled students
#[utoipa::path(
    get,
    path = "/groups/{id}",
    params(
        ("id" = Uuid, Path, description = "Group ID")
    ),
    responses(
        (status = 200, description = "Group details", body = GroupWithStudents),
        (status = 400, description = "Group not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Groups",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_group_by_id(
    State(state): State<AppState>,
    _member: RequireMember,
    Path(id): Path<Uuid>,
) -> Result<Json<GroupWithStudents>, AppError> {
    let group = GroupService::get_group_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Such group doesn't exist")))?;
    Ok(Json(group))
}

/// Create a group
#[utoipa::path(
    post,
    path = "/groups",
    request_body = CreateGroupDto,
    responses(
        (status = 201, description = "Group created", body = Group,
         headers(("Location" = String, description = "URL of the created group"))),
        (status = 400, description = "Invalid group", body = ErrorResponse)
    ),
    tag = "Groups"
)]
#[instrument(skip(state))]
pub async fn add_group(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateGroupDto>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let group = GroupService::add_group(&state.db, dto).await?;
    let location = format!("/groups/{}", group.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(group),
    ))
}

/// Delete a group, detaching its students
#[utoipa::path(
    delete,
    path = "/groups/{id}",
    params(
        ("id" = Uuid, Path, description = "Group ID")
    ),
    responses(
        (status = 204, description = "Group deleted"),
        (status = 400, description = "Group not found", body = ErrorResponse)
    ),
    tag = "Groups"
)]
#[instrument(skip(state))]
pub async fn delete_group(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    GroupService::delete_group(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Assign a student to a group
#[utoipa::path(
    patch,
    path = "/groups/add_student/{student_id}/to_group/{group_id}",
    params(
        ("student_id" = Uuid, Path, description = "Student ID"),
        ("group_id" = Uuid, Path, description = "Group ID")
    ),
    responses(
        (status = 200, description = "Student assigned to group"),
        (status = 400, description = "Student or group not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires a Teacher token", body = ErrorResponse)
    ),
    tag = "Groups",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn add_student_to_group(
    State(state): State<AppState>,
    _teacher: RequireTeacher,
    Path((student_id, group_id)): Path<(Uuid, Uuid)>,
) -> Result<(), AppError> {
    GroupService::add_student_to_group(&state.db, group_id, student_id).await
}
