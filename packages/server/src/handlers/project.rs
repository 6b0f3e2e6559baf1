use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{project, project_contributor, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::project::*;
use crate::models::shared::{Pagination, escape_like};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Projects",
    operation_id = "listProjects",
    summary = "List projects with pagination and search",
    params(ProjectListQuery),
    responses(
        (status = 200, description = "List of projects", body = ProjectListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, query))]
pub async fn list_projects(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ProjectListQuery>,
) -> Result<Json<ProjectListResponse>, AppError> {
    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let mut select = project::Entity::find();

    if let Some(ref search) = query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(project::Column::Name)))
                    .like(LikeExpr::new(format!("%{}%", term.to_lowercase())).escape('\\')),
            );
        }
    }
    if let Some(ref status) = query.status {
        select = select.filter(project::Column::Status.eq(status));
    }

    let paginator = select
        .order_by_desc(project::Column::CreatedAt)
        .paginate(&state.db, per_page);
    let total = paginator.num_items().await?;
    let total_pages = total.div_ceil(per_page);

    let data = paginator
        .fetch_page(page - 1)
        .await?
        .into_iter()
        .map(ProjectResponse::from)
        .collect();

    Ok(Json(ProjectListResponse {
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
    tag = "Projects",
    operation_id = "createProject",
    summary = "Create a project (admin)",
    description = "The lead must be an existing user and is added to the contributor set automatically.",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Lead user not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Project name taken (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_project(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateProjectRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    validate_create_project(&payload)?;

    let txn = state.db.begin().await?;

    let lead = user::Entity::find_by_id(payload.lead_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Lead user not found".into()))?;

    let now = chrono::Utc::now();
    let new_project = project::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description),
        status: Set(payload.status.unwrap_or_else(|| "planned".to_string())),
        tech_stack: Set(serde_json::json!(payload.tech_stack.unwrap_or_default())),
        github_repo: Set(payload.github_repo),
        lead_id: Set(Some(lead.id)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_project
        .insert(&txn)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Conflict("Project name is already taken".into())
            }
            _ => AppError::from(e),
        })?;

    // Lead membership is explicit in the contributor set, not implied by lead_id.
    add_to_contributors(&txn, model.id, lead.id, now).await?;

    txn.commit().await?;
    Ok((StatusCode::CREATED, Json(ProjectResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Projects",
    operation_id = "getProject",
    summary = "Get a project by ID",
    params(("id" = i32, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project details", body = ProjectResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Project not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(id))]
pub async fn get_project(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProjectResponse>, AppError> {
    let model = find_project(&state.db, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Projects",
    operation_id = "updateProject",
    summary = "Update a project (admin)",
    description = "Partially updates a project using PATCH semantics. Changing the lead adds the new lead to the contributor set.",
    params(("id" = i32, Path, description = "Project ID")),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Project updated", body = ProjectResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Project not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Project name taken (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_project(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateProjectRequest>,
) -> Result<Json<ProjectResponse>, AppError> {
    auth_user.require_admin()?;
    validate_update_project(&payload)?;

    let txn = state.db.begin().await?;
    let existing = find_project(&txn, id).await?;

    if payload == UpdateProjectRequest::default() {
        return Ok(Json(existing.into()));
    }

    let now = chrono::Utc::now();
    let new_lead = match payload.lead_id {
        Some(lead_id) => {
            let lead = user::Entity::find_by_id(lead_id)
                .one(&txn)
                .await?
                .ok_or_else(|| AppError::NotFound("Lead user not found".into()))?;
            Some(lead)
        }
        None => None,
    };

    let mut active: project::ActiveModel = existing.into();

    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    if let Some(tech_stack) = payload.tech_stack {
        active.tech_stack = Set(serde_json::json!(tech_stack));
    }
    if let Some(github_repo) = payload.github_repo {
        active.github_repo = Set(github_repo);
    }
    if let Some(ref lead) = new_lead {
        active.lead_id = Set(Some(lead.id));
    }
    active.updated_at = Set(now);

    let model = active.update(&txn).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("Project name is already taken".into())
        }
        _ => AppError::from(e),
    })?;

    if let Some(lead) = new_lead {
        add_to_contributors(&txn, model.id, lead.id, now).await?;
    }

    txn.commit().await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Projects",
    operation_id = "deleteProject",
    summary = "Delete a project (admin)",
    params(("id" = i32, Path, description = "Project ID")),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Project not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_project(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let txn = state.db.begin().await?;
    find_project(&txn, id).await?;

    project_contributor::Entity::delete_many()
        .filter(project_contributor::Column::ProjectId.eq(id))
        .exec(&txn)
        .await?;
    project::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/{id}/contributors",
    tag = "Projects",
    operation_id = "listContributors",
    summary = "List a project's contributors",
    params(("id" = i32, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Contributors", body = Vec<ContributorResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Project not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(id))]
pub async fn list_contributors(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<ContributorResponse>>, AppError> {
    find_project(&state.db, id).await?;

    let rows = project_contributor::Entity::find()
        .filter(project_contributor::Column::ProjectId.eq(id))
        .find_also_related(user::Entity)
        .order_by_asc(project_contributor::Column::AddedAt)
        .all(&state.db)
        .await?;

    let items = rows
        .into_iter()
        .map(|(pc, usr)| ContributorResponse {
            project_id: pc.project_id,
            user_id: pc.user_id,
            username: usr.map(|u| u.username).unwrap_or_default(),
            added_at: pc.added_at,
        })
        .collect();

    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/{id}/contributors",
    tag = "Projects",
    operation_id = "addContributor",
    summary = "Add a contributor to a project (admin)",
    params(("id" = i32, Path, description = "Project ID")),
    request_body = AddContributorRequest,
    responses(
        (status = 201, description = "Contributor added", body = ContributorResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Project or user not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already a contributor (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn add_contributor(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<AddContributorRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let txn = state.db.begin().await?;
    find_project(&txn, id).await?;

    let target_user = user::Entity::find_by_id(payload.user_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let now = chrono::Utc::now();
    let new_pc = project_contributor::ActiveModel {
        project_id: Set(id),
        user_id: Set(payload.user_id),
        added_at: Set(now),
    };

    match new_pc.insert(&txn).await {
        Ok(model) => {
            txn.commit().await?;
            Ok((
                StatusCode::CREATED,
                Json(ContributorResponse {
                    project_id: model.project_id,
                    user_id: model.user_id,
                    username: target_user.username,
                    added_at: model.added_at,
                }),
            ))
        }
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Err(AppError::Conflict("Already a contributor".into()))
        }
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    delete,
    path = "/{id}/contributors/{user_id}",
    tag = "Projects",
    operation_id = "removeContributor",
    summary = "Remove a contributor from a project (admin)",
    description = "The project lead cannot be removed from the contributor set.",
    params(
        ("id" = i32, Path, description = "Project ID"),
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 204, description = "Contributor removed"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Project or contributor not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Cannot remove the lead (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, user_id))]
pub async fn remove_contributor(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((id, user_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let project = find_project(&state.db, id).await?;
    if project.lead_id == Some(user_id) {
        return Err(AppError::Conflict(
            "Cannot remove the project lead from contributors".into(),
        ));
    }

    let result = project_contributor::Entity::delete_many()
        .filter(project_contributor::Column::ProjectId.eq(id))
        .filter(project_contributor::Column::UserId.eq(user_id))
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Contributor not found".into()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Union a user into the contributor set. Adding an existing member is a no-op.
async fn add_to_contributors<C: ConnectionTrait>(
    db: &C,
    project_id: i32,
    user_id: i32,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<(), DbErr> {
    let model = project_contributor::ActiveModel {
        project_id: Set(project_id),
        user_id: Set(user_id),
        added_at: Set(now),
    };

    let result = project_contributor::Entity::insert(model)
        .on_conflict(
            sea_orm::sea_query::OnConflict::columns([
                project_contributor::Column::ProjectId,
                project_contributor::Column::UserId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(db)
        .await;

    match result {
        Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
        Err(e) => Err(e),
    }
}

async fn find_project<C: ConnectionTrait>(db: &C, id: i32) -> Result<project::Model, AppError> {
    project::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))
}
