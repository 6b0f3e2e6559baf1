use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Project lifecycle statuses.
pub const STATUSES: &[&str] = &["planned", "in_progress", "done"];

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,
    pub description: String,
    /// One of: planned, in_progress, done
    pub status: String,

    /// Ordered list of technology names stored as a JSON array of strings.
    #[sea_orm(column_type = "JsonBinary")]
    pub tech_stack: serde_json::Value,
    pub github_repo: Option<String>,

    /// NULL only for projects bootstrapped before an admin exists.
    pub lead_id: Option<i32>,
    #[sea_orm(belongs_to, from = "lead_id", to = "id")]
    pub lead: BelongsTo<Option<super::user::Entity>>,

    #[sea_orm(has_many, via = "project_contributor")]
    pub contributors: HasMany<super::user::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
