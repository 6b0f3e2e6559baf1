use axum::Json;
use axum::extract::{Query, State};
use sea_orm::*;
use tracing::instrument;

use crate::entity::user;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::leaderboard::{
    LeaderboardEntry, LeaderboardQuery, LeaderboardResponse, validate_leaderboard_query,
};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Leaderboard",
    operation_id = "getLeaderboard",
    summary = "Get the member leaderboard",
    description = "Members ranked by points, highest first. Ties are broken alphabetically by username.",
    params(LeaderboardQuery),
    responses(
        (status = 200, description = "Ranked members", body = LeaderboardResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, query))]
pub async fn get_leaderboard(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    validate_leaderboard_query(&query)?;

    let period = query
        .period
        .unwrap_or_else(|| "all_time".to_string());
    let limit = query.limit.unwrap_or(50).clamp(1, 100);

    let members = user::Entity::find()
        .filter(user::Column::IsMember.eq(true))
        .order_by_desc(user::Column::Points)
        .order_by_asc(user::Column::Username)
        .limit(Some(limit))
        .all(&state.db)
        .await?;

    let data = members
        .into_iter()
        .enumerate()
        .map(|(i, m)| LeaderboardEntry::from_ranked(i as u64 + 1, m))
        .collect();

    Ok(Json(LeaderboardResponse { period, data }))
}
