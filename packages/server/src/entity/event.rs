use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Calendar event kinds.
pub const EVENT_TYPES: &[&str] = &["meeting", "workshop", "competition"];

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    pub description: String,
    /// One of: meeting, workshop, competition
    pub event_type: String,
    pub event_date: DateTimeUtc,
    pub location: String,

    #[sea_orm(has_many, via = "attendance")]
    pub attendees: HasMany<super::user::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
