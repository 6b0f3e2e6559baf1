use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, validate_choice, validate_title};
use crate::entity::{attendance, event};
use crate::error::AppError;

#[derive(Deserialize, utoipa::IntoParams)]
pub struct EventListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Filter by event kind.
    pub event_type: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub event_type: String,
    pub event_date: DateTime<Utc>,
    pub location: String,
}

pub fn validate_create_event(payload: &CreateEventRequest) -> Result<(), AppError> {
    validate_title(&payload.title)?;
    validate_choice(&payload.event_type, event::EVENT_TYPES, "event_type")?;
    if payload.location.trim().is_empty() {
        return Err(AppError::Validation("Location must not be empty".into()));
    }
    Ok(())
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_type: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
}

pub fn validate_update_event(payload: &UpdateEventRequest) -> Result<(), AppError> {
    if let Some(ref title) = payload.title {
        validate_title(title)?;
    }
    if let Some(ref event_type) = payload.event_type {
        validate_choice(event_type, event::EVENT_TYPES, "event_type")?;
    }
    if let Some(ref location) = payload.location
        && location.trim().is_empty()
    {
        return Err(AppError::Validation("Location must not be empty".into()));
    }
    Ok(())
}

/// Request body for marking a user's attendance at an event.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct MarkAttendanceRequest {
    pub user_id: i32,
    /// Defaults to `present` when absent.
    pub status: Option<String>,
}

pub fn validate_mark_attendance(payload: &MarkAttendanceRequest) -> Result<(), AppError> {
    if let Some(ref status) = payload.status {
        validate_choice(status, attendance::STATUSES, "status")?;
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct EventResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub event_type: String,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

impl From<event::Model> for EventResponse {
    fn from(m: event::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            event_type: m.event_type,
            event_date: m.event_date,
            location: m.location,
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct EventListResponse {
    pub data: Vec<EventResponse>,
    pub pagination: Pagination,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AttendanceResponse {
    pub event_id: i32,
    pub user_id: i32,
    pub username: String,
    pub status: String,
    pub marked_at: DateTime<Utc>,
}

/// One row of the current user's attendance history.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MyAttendanceEntry {
    pub event_id: i32,
    pub title: String,
    pub event_type: String,
    pub event_date: DateTime<Utc>,
    pub status: String,
    pub marked_at: DateTime<Utc>,
}
