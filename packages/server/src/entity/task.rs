use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Task workflow statuses.
pub const STATUSES: &[&str] = &["pending", "in_progress", "submitted"];

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "task")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    pub description: String,
    /// Points awarded to the assignee once the task is verified.
    pub points: i32,
    /// One of: pending, in_progress, submitted
    pub status: String,
    /// Set once by the verify endpoint; verified tasks award their points.
    pub verified: bool,

    pub assigned_to: i32,
    #[sea_orm(belongs_to, from = "assigned_to", to = "id")]
    pub assignee: HasOne<super::user::Entity>,

    pub due_date: DateTimeUtc,
    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
