use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{attendance, event, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::event::*;
use crate::models::shared::Pagination;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Events",
    operation_id = "listEvents",
    summary = "List events with pagination",
    description = "Events ordered by date, soonest first. Optionally filtered by kind.",
    params(EventListQuery),
    responses(
        (status = 200, description = "List of events", body = EventListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, query))]
pub async fn list_events(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<EventListQuery>,
) -> Result<Json<EventListResponse>, AppError> {
    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let mut select = event::Entity::find();

    if let Some(ref event_type) = query.event_type {
        select = select.filter(event::Column::EventType.eq(event_type));
    }

    let paginator = select
        .order_by_asc(event::Column::EventDate)
        .paginate(&state.db, per_page);
    let total = paginator.num_items().await?;
    let total_pages = total.div_ceil(per_page);

    let data = paginator
        .fetch_page(page - 1)
        .await?
        .into_iter()
        .map(EventResponse::from)
        .collect();

    Ok(Json(EventListResponse {
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
    tag = "Events",
    operation_id = "createEvent",
    summary = "Create an event (admin)",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title))]
pub async fn create_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    validate_create_event(&payload)?;

    let new_event = event::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        description: Set(payload.description),
        event_type: Set(payload.event_type),
        event_date: Set(payload.event_date),
        location: Set(payload.location.trim().to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = new_event.insert(&state.db).await?;
    Ok((StatusCode::CREATED, Json(EventResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Events",
    operation_id = "getEvent",
    summary = "Get an event by ID",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event details", body = EventResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(id))]
pub async fn get_event(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<EventResponse>, AppError> {
    let model = find_event(&state.db, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Events",
    operation_id = "updateEvent",
    summary = "Update an event (admin)",
    params(("id" = i32, Path, description = "Event ID")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = EventResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateEventRequest>,
) -> Result<Json<EventResponse>, AppError> {
    auth_user.require_admin()?;
    validate_update_event(&payload)?;

    let existing = find_event(&state.db, id).await?;

    if payload == UpdateEventRequest::default() {
        return Ok(Json(existing.into()));
    }

    let mut active: event::ActiveModel = existing.into();

    if let Some(ref title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(event_type) = payload.event_type {
        active.event_type = Set(event_type);
    }
    if let Some(event_date) = payload.event_date {
        active.event_date = Set(event_date);
    }
    if let Some(location) = payload.location {
        active.location = Set(location.trim().to_string());
    }

    let model = active.update(&state.db).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Events",
    operation_id = "deleteEvent",
    summary = "Delete an event (admin)",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let txn = state.db.begin().await?;
    find_event(&txn, id).await?;

    attendance::Entity::delete_many()
        .filter(attendance::Column::EventId.eq(id))
        .exec(&txn)
        .await?;
    event::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/{id}/attendance",
    tag = "Events",
    operation_id = "listAttendance",
    summary = "List attendance for an event (admin)",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Attendance records", body = Vec<AttendanceResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn list_attendance(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<AttendanceResponse>>, AppError> {
    auth_user.require_admin()?;
    find_event(&state.db, id).await?;

    let rows = attendance::Entity::find()
        .filter(attendance::Column::EventId.eq(id))
        .find_also_related(user::Entity)
        .order_by_asc(attendance::Column::MarkedAt)
        .all(&state.db)
        .await?;

    let items = rows
        .into_iter()
        .map(|(att, usr)| AttendanceResponse {
            event_id: att.event_id,
            user_id: att.user_id,
            username: usr.map(|u| u.username).unwrap_or_default(),
            status: att.status,
            marked_at: att.marked_at,
        })
        .collect();

    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/{id}/attendance",
    tag = "Events",
    operation_id = "markAttendance",
    summary = "Mark a user's attendance at an event (admin)",
    params(("id" = i32, Path, description = "Event ID")),
    request_body = MarkAttendanceRequest,
    responses(
        (status = 201, description = "Attendance marked", body = AttendanceResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Event or user not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already marked (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn mark_attendance(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<MarkAttendanceRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    validate_mark_attendance(&payload)?;

    let txn = state.db.begin().await?;
    find_event(&txn, id).await?;

    let target_user = user::Entity::find_by_id(payload.user_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let new_att = attendance::ActiveModel {
        event_id: Set(id),
        user_id: Set(payload.user_id),
        status: Set(payload.status.unwrap_or_else(|| "present".to_string())),
        marked_at: Set(chrono::Utc::now()),
    };

    match new_att.insert(&txn).await {
        Ok(model) => {
            txn.commit().await?;
            Ok((
                StatusCode::CREATED,
                Json(AttendanceResponse {
                    event_id: model.event_id,
                    user_id: model.user_id,
                    username: target_user.username,
                    status: model.status,
                    marked_at: model.marked_at,
                }),
            ))
        }
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Err(AppError::Conflict("Attendance already marked".into()))
        }
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    get,
    path = "/mine",
    tag = "Events",
    operation_id = "myAttendance",
    summary = "Get the current user's attendance history",
    responses(
        (status = 200, description = "Attendance history", body = Vec<MyAttendanceEntry>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn my_attendance(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<MyAttendanceEntry>>, AppError> {
    let rows = attendance::Entity::find()
        .filter(attendance::Column::UserId.eq(auth_user.user_id))
        .find_also_related(event::Entity)
        .order_by_desc(attendance::Column::MarkedAt)
        .all(&state.db)
        .await?;

    let items = rows
        .into_iter()
        .filter_map(|(att, evt)| {
            evt.map(|e| MyAttendanceEntry {
                event_id: att.event_id,
                title: e.title,
                event_type: e.event_type,
                event_date: e.event_date,
                status: att.status,
                marked_at: att.marked_at,
            })
        })
        .collect();

    Ok(Json(items))
}

async fn find_event<C: ConnectionTrait>(db: &C, id: i32) -> Result<event::Model, AppError> {
    event::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".into()))
}
