use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Skill levels recognised for members.
pub const SKILL_LEVELS: &[&str] = &["beginner", "intermediate", "advanced"];

/// Skill level assigned to newly registered users.
pub const DEFAULT_SKILL_LEVEL: &str = "beginner";

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,
    pub email: String,
    /// Argon2 hash, never the clear-text password.
    pub password: String,
    pub first_name: String,
    pub last_name: String,

    pub is_admin: bool,
    pub is_member: bool,

    /// Running total awarded through verified tasks.
    pub points: i32,
    pub student_id: Option<String>,
    pub batch_year: Option<i32>,
    /// One of: beginner, intermediate, advanced
    pub skill_level: String,

    #[sea_orm(has_many)]
    pub tasks: HasMany<super::task::Entity>,

    #[sea_orm(has_many, via = "project_contributor")]
    pub projects: HasMany<super::project::Entity>,

    #[sea_orm(has_many, via = "attendance")]
    pub events: HasMany<super::event::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
