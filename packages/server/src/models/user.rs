use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, double_option, validate_choice};
use crate::entity::user;
use crate::error::AppError;
use crate::models::auth::validate_email;

#[derive(Deserialize, utoipa::IntoParams)]
pub struct UserListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Matches against username, email, and names.
    pub search: Option<String>,
    /// `created_at`, `username`, or `points`.
    pub sort_by: Option<String>,
    /// `asc` or `desc`.
    pub sort_order: Option<String>,
}

/// Request body for admin user creation.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: Option<bool>,
    pub is_member: Option<bool>,
    pub points: Option<i32>,
    pub student_id: Option<String>,
    pub batch_year: Option<i32>,
    pub skill_level: Option<String>,
}

pub fn validate_create_user(payload: &CreateUserRequest) -> Result<(), AppError> {
    let username = payload.username.trim();
    if username.is_empty() || username.chars().count() > 32 {
        return Err(AppError::Validation(
            "Username must be 1-32 characters".into(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(AppError::Validation(
            "Username must contain only letters, digits, and underscores".into(),
        ));
    }
    if payload.password.len() < 8 || payload.password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be 8-128 characters".into(),
        ));
    }
    validate_email(&payload.email)?;
    if let Some(points) = payload.points
        && points < 0
    {
        return Err(AppError::Validation("Points must be >= 0".into()));
    }
    if let Some(ref level) = payload.skill_level {
        validate_choice(level, user::SKILL_LEVELS, "skill_level")?;
    }
    Ok(())
}

/// Request body for admin user updates (PATCH semantics).
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_admin: Option<bool>,
    pub is_member: Option<bool>,
    pub points: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub student_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub batch_year: Option<Option<i32>>,
    pub skill_level: Option<String>,
}

pub fn validate_update_user(payload: &UpdateUserRequest) -> Result<(), AppError> {
    if let Some(ref email) = payload.email {
        validate_email(email)?;
    }
    if let Some(points) = payload.points
        && points < 0
    {
        return Err(AppError::Validation("Points must be >= 0".into()));
    }
    if let Some(ref level) = payload.skill_level {
        validate_choice(level, user::SKILL_LEVELS, "skill_level")?;
    }
    Ok(())
}

/// A user as exposed through the API. Never carries the password hash.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
    pub is_member: bool,
    pub points: i32,
    pub student_id: Option<String>,
    pub batch_year: Option<i32>,
    pub skill_level: String,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            email: m.email,
            first_name: m.first_name,
            last_name: m.last_name,
            is_admin: m.is_admin,
            is_member: m.is_member,
            points: m.points,
            student_id: m.student_id,
            batch_year: m.batch_year,
            skill_level: m.skill_level,
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserListResponse {
    pub data: Vec<UserResponse>,
    pub pagination: Pagination,
}
