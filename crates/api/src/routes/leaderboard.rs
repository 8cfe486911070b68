use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use pmprep_services::leaderboard::LeaderboardEntry;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize)]
pub struct GlobalParams {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

#[derive(Debug, Serialize)]
pub struct LeaderboardRow {
    pub user_id: String,
    pub username: String,
    pub average_score: f64,
    pub total_attempts: u64,
}

pub async fn global(
    State(state): State<AppState>,
    Query(params): Query<GlobalParams>,
) -> Result<Json<Vec<LeaderboardRow>>, ApiError> {
    let entries = state.leaderboard.global(params.limit).await?;
    Ok(Json(entries.into_iter().map(to_row).collect()))
}

pub async fn friends(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<LeaderboardRow>>, ApiError> {
    let entries = state.leaderboard.friends(auth.user_id).await?;
    Ok(Json(entries.into_iter().map(to_row).collect()))
}

fn to_row(entry: LeaderboardEntry) -> LeaderboardRow {
    LeaderboardRow {
        user_id: entry.user_id.to_hex(),
        username: entry.username,
        average_score: entry.average_score,
        total_attempts: entry.total_attempts,
    }
}
