use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Attendance statuses.
pub const STATUSES: &[&str] = &["present", "absent"];

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub event_id: i32,
    #[sea_orm(primary_key)]
    pub user_id: i32,
    #[sea_orm(belongs_to, from = "event_id", to = "id")]
    pub event: BelongsTo<super::event::Entity>,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: BelongsTo<super::user::Entity>,

    /// One of: present, absent
    pub status: String,
    pub marked_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
