use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, validate_choice, validate_title};
use crate::entity::task;
use crate::error::AppError;

#[derive(Deserialize, utoipa::IntoParams)]
pub struct TaskListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Filter by assignee user ID.
    pub assigned_to: Option<i32>,
    /// Filter by workflow status.
    pub status: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
    pub assigned_to: i32,
    /// Defaults to 20 when absent.
    pub points: Option<i32>,
    /// Defaults to `pending` when absent.
    pub status: Option<String>,
    pub due_date: DateTime<Utc>,
}

pub fn validate_create_task(payload: &CreateTaskRequest) -> Result<(), AppError> {
    validate_title(&payload.title)?;
    if let Some(points) = payload.points
        && points < 0
    {
        return Err(AppError::Validation("Points must be >= 0".into()));
    }
    if let Some(ref status) = payload.status {
        validate_choice(status, task::STATUSES, "status")?;
    }
    Ok(())
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<i32>,
    pub points: Option<i32>,
    pub status: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

pub fn validate_update_task(payload: &UpdateTaskRequest) -> Result<(), AppError> {
    if let Some(ref title) = payload.title {
        validate_title(title)?;
    }
    if let Some(points) = payload.points
        && points < 0
    {
        return Err(AppError::Validation("Points must be >= 0".into()));
    }
    if let Some(ref status) = payload.status {
        validate_choice(status, task::STATUSES, "status")?;
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TaskResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub points: i32,
    pub status: String,
    pub verified: bool,
    pub assigned_to: i32,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<task::Model> for TaskResponse {
    fn from(m: task::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            points: m.points,
            status: m.status,
            verified: m.verified,
            assigned_to: m.assigned_to,
            due_date: m.due_date,
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TaskListResponse {
    pub data: Vec<TaskResponse>,
    pub pagination: Pagination,
}
