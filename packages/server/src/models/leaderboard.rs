use serde::{Deserialize, Serialize};

use crate::entity::user;
use crate::error::AppError;
use crate::models::shared::validate_choice;

/// Ranking periods accepted by the leaderboard endpoint. Points are a single
/// running total, so every period ranks by the same number; the parameter is
/// validated and echoed for client compatibility.
pub const PERIODS: &[&str] = &["all_time", "monthly", "weekly"];

#[derive(Deserialize, utoipa::IntoParams)]
pub struct LeaderboardQuery {
    /// `all_time` (default), `monthly`, or `weekly`.
    pub period: Option<String>,
    /// Maximum number of entries (1-100, default 50).
    pub limit: Option<u64>,
}

pub fn validate_leaderboard_query(query: &LeaderboardQuery) -> Result<(), AppError> {
    if let Some(ref period) = query.period {
        validate_choice(period, PERIODS, "period")?;
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LeaderboardEntry {
    /// 1-based rank.
    pub rank: u64,
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub points: i32,
    pub skill_level: String,
}

impl LeaderboardEntry {
    pub fn from_ranked(rank: u64, m: user::Model) -> Self {
        Self {
            rank,
            id: m.id,
            username: m.username,
            first_name: m.first_name,
            last_name: m.last_name,
            points: m.points,
            skill_level: m.skill_level,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LeaderboardResponse {
    pub period: String,
    pub data: Vec<LeaderboardEntry>,
}
