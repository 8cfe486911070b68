use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};

use pmprep_db::models::{Friendship, FriendshipStatus};

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize)]
pub struct FriendRequestBody {
    pub recipient_id: String,
}

#[derive(Debug, Serialize)]
pub struct FriendshipResponse {
    pub id: String,
    pub requester_id: String,
    pub recipient_id: String,
    pub status: FriendshipStatus,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct FriendSummary {
    pub id: String,
    pub username: String,
}

pub async fn request(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<FriendRequestBody>,
) -> Result<(StatusCode, Json<FriendshipResponse>), ApiError> {
    let recipient_id = ObjectId::parse_str(&body.recipient_id)
        .map_err(|_| ApiError::BadRequest("Invalid recipient_id".to_string()))?;

    // The target must exist before a request is recorded.
    state.users.base.find_by_id(recipient_id).await?;

    let friendship = state.friendships.request(auth.user_id, recipient_id).await?;
    Ok((StatusCode::CREATED, Json(to_response(friendship))))
}

pub async fn accept(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(friendship_id): Path<String>,
) -> Result<Json<FriendshipResponse>, ApiError> {
    respond(state, auth, &friendship_id, FriendshipStatus::Accepted).await
}

pub async fn reject(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(friendship_id): Path<String>,
) -> Result<Json<FriendshipResponse>, ApiError> {
    respond(state, auth, &friendship_id, FriendshipStatus::Rejected).await
}

async fn respond(
    state: AppState,
    auth: AuthUser,
    friendship_id: &str,
    status: FriendshipStatus,
) -> Result<Json<FriendshipResponse>, ApiError> {
    let id = ObjectId::parse_str(friendship_id)
        .map_err(|_| ApiError::BadRequest("Invalid friendship_id".to_string()))?;

    let friendship = state.friendships.respond(id, auth.user_id, status).await?;
    Ok(Json(to_response(friendship)))
}

/// All accepted friends, whichever side initiated.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<FriendSummary>>, ApiError> {
    let friend_ids = state.friendships.accepted_friend_ids(auth.user_id).await?;
    if friend_ids.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let ids_bson: Vec<bson::Bson> = friend_ids.iter().map(|id| bson::Bson::ObjectId(*id)).collect();
    let friends = state
        .users
        .base
        .find_many(doc! { "_id": { "$in": ids_bson } }, None)
        .await?;

    Ok(Json(
        friends
            .into_iter()
            .filter_map(|u| {
                u.id.map(|id| FriendSummary {
                    id: id.to_hex(),
                    username: u.username,
                })
            })
            .collect(),
    ))
}

pub async fn pending(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<FriendshipResponse>>, ApiError> {
    let requests = state.friendships.pending_for(auth.user_id).await?;
    Ok(Json(requests.into_iter().map(to_response).collect()))
}

fn to_response(friendship: Friendship) -> FriendshipResponse {
    FriendshipResponse {
        id: friendship.id.map(|id| id.to_hex()).unwrap_or_default(),
        requester_id: friendship.requester_id.to_hex(),
        recipient_id: friendship.recipient_id.to_hex(),
        status: friendship.status,
        created_at: friendship
            .created_at
            .try_to_rfc3339_string()
            .unwrap_or_default(),
    }
}
