use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, double_option, validate_choice, validate_title};
use crate::entity::project;
use crate::error::AppError;

#[derive(Deserialize, utoipa::IntoParams)]
pub struct ProjectListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Case-insensitive match against the project name.
    pub search: Option<String>,
    /// Filter by lifecycle status.
    pub status: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: String,
    /// Defaults to `planned` when absent.
    pub status: Option<String>,
    /// Ordered list of technology names.
    pub tech_stack: Option<Vec<String>>,
    pub github_repo: Option<String>,
    /// The project lead; added to the contributor set automatically.
    pub lead_id: i32,
}

pub fn validate_create_project(payload: &CreateProjectRequest) -> Result<(), AppError> {
    validate_title(&payload.name)?;
    if let Some(ref status) = payload.status {
        validate_choice(status, project::STATUSES, "status")?;
    }
    Ok(())
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub tech_stack: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub github_repo: Option<Option<String>>,
    pub lead_id: Option<i32>,
}

pub fn validate_update_project(payload: &UpdateProjectRequest) -> Result<(), AppError> {
    if let Some(ref name) = payload.name {
        validate_title(name)?;
    }
    if let Some(ref status) = payload.status {
        validate_choice(status, project::STATUSES, "status")?;
    }
    Ok(())
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AddContributorRequest {
    pub user_id: i32,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProjectResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub status: String,
    pub tech_stack: Vec<String>,
    pub github_repo: Option<String>,
    pub lead_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<project::Model> for ProjectResponse {
    fn from(m: project::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            status: m.status,
            tech_stack: serde_json::from_value(m.tech_stack).unwrap_or_default(),
            github_repo: m.github_repo,
            lead_id: m.lead_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProjectListResponse {
    pub data: Vec<ProjectResponse>,
    pub pagination: Pagination,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ContributorResponse {
    pub project_id: i32,
    pub user_id: i32,
    pub username: String,
    pub added_at: DateTime<Utc>,
}
