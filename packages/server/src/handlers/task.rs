use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{task, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::shared::Pagination;
use crate::models::task::*;
use crate::state::AppState;

/// Default points value for tasks created without an explicit award.
const DEFAULT_TASK_POINTS: i32 = 20;

#[utoipa::path(
    get,
    path = "/",
    tag = "Tasks",
    operation_id = "listTasks",
    summary = "List tasks with pagination and filters",
    description = "Admins see all tasks and may filter by assignee; other users only see their own tasks.",
    params(TaskListQuery),
    responses(
        (status = 200, description = "List of tasks", body = TaskListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_tasks(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<TaskListQuery>,
) -> Result<Json<TaskListResponse>, AppError> {
    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let mut select = task::Entity::find();

    if auth_user.is_admin {
        if let Some(assigned_to) = query.assigned_to {
            select = select.filter(task::Column::AssignedTo.eq(assigned_to));
        }
    } else {
        select = select.filter(task::Column::AssignedTo.eq(auth_user.user_id));
    }
    if let Some(ref status) = query.status {
        select = select.filter(task::Column::Status.eq(status));
    }

    let paginator = select
        .order_by_asc(task::Column::DueDate)
        .paginate(&state.db, per_page);
    let total = paginator.num_items().await?;
    let total_pages = total.div_ceil(per_page);

    let data = paginator
        .fetch_page(page - 1)
        .await?
        .into_iter()
        .map(TaskResponse::from)
        .collect();

    Ok(Json(TaskListResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Tasks",
    operation_id = "createTask",
    summary = "Create a task (admin)",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Assignee not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title))]
pub async fn create_task(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateTaskRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    validate_create_task(&payload)?;

    user::Entity::find_by_id(payload.assigned_to)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Assignee not found".into()))?;

    let new_task = task::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        description: Set(payload.description),
        points: Set(payload.points.unwrap_or(DEFAULT_TASK_POINTS)),
        status: Set(payload.status.unwrap_or_else(|| "pending".to_string())),
        verified: Set(false),
        assigned_to: Set(payload.assigned_to),
        due_date: Set(payload.due_date),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = new_task.insert(&state.db).await?;
    Ok((StatusCode::CREATED, Json(TaskResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Tasks",
    operation_id = "getTask",
    summary = "Get a task by ID",
    description = "Admins can view any task; other users only their own.",
    params(("id" = i32, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task details", body = TaskResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Task not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_task(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TaskResponse>, AppError> {
    let model = find_task(&state.db, id).await?;
    auth_user.require_self_or_admin(model.assigned_to)?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Tasks",
    operation_id = "updateTask",
    summary = "Update a task (admin)",
    params(("id" = i32, Path, description = "Task ID")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = TaskResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Task or assignee not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_task(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, AppError> {
    auth_user.require_admin()?;
    validate_update_task(&payload)?;

    let existing = find_task(&state.db, id).await?;

    if payload == UpdateTaskRequest::default() {
        return Ok(Json(existing.into()));
    }

    if let Some(assigned_to) = payload.assigned_to {
        user::Entity::find_by_id(assigned_to)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Assignee not found".into()))?;
    }

    let mut active: task::ActiveModel = existing.into();

    if let Some(ref title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(assigned_to) = payload.assigned_to {
        active.assigned_to = Set(assigned_to);
    }
    if let Some(points) = payload.points {
        active.points = Set(points);
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    if let Some(due_date) = payload.due_date {
        active.due_date = Set(due_date);
    }

    let model = active.update(&state.db).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Tasks",
    operation_id = "deleteTask",
    summary = "Delete a task (admin)",
    params(("id" = i32, Path, description = "Task ID")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Task not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_task(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    find_task(&state.db, id).await?;
    task::Entity::delete_by_id(id).exec(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/{id}/verify",
    tag = "Tasks",
    operation_id = "verifyTask",
    summary = "Verify a task and award its points (admin)",
    description = "Marks the task verified and adds its points to the assignee's total. A task can only be verified once.",
    params(("id" = i32, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task verified", body = TaskResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Task not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already verified (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn verify_task(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TaskResponse>, AppError> {
    auth_user.require_admin()?;

    let txn = state.db.begin().await?;
    let existing = find_task(&txn, id).await?;

    if existing.verified {
        return Err(AppError::Conflict("Task already verified".into()));
    }

    let assignee = user::Entity::find_by_id(existing.assigned_to)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Assignee not found".into()))?;

    let points = existing.points;
    let mut active: task::ActiveModel = existing.into();
    active.verified = Set(true);
    let model = active.update(&txn).await?;

    let new_total = assignee.points + points;
    let mut assignee: user::ActiveModel = assignee.into();
    assignee.points = Set(new_total);
    assignee.update(&txn).await?;

    txn.commit().await?;
    Ok(Json(model.into()))
}

async fn find_task<C: ConnectionTrait>(db: &C, id: i32) -> Result<task::Model, AppError> {
    task::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))
}
