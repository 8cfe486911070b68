use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use validator::Validate;

use pmprep_db::models::User;
use pmprep_services::auth::AuthError;
use pmprep_services::dao::base::DaoError;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: UserResponse,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let password_hash = state.auth.hash_password(&body.password)?;
    let user = state
        .users
        .create(body.username, body.email, password_hash)
        .await?;

    token_response(&state, user)
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = match state.users.find_by_email(&body.email).await {
        Ok(user) => user,
        Err(DaoError::NotFound) => return Err(AuthError::InvalidCredentials.into()),
        Err(e) => return Err(e.into()),
    };

    if !state.auth.verify_password(&body.password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials.into());
    }

    token_response(&state, user)
}

pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.users.base.find_by_id(auth.user_id).await?;
    Ok(Json(to_response(user)))
}

fn token_response(state: &AppState, user: User) -> Result<Json<TokenResponse>, ApiError> {
    let user_id = user
        .id
        .ok_or_else(|| ApiError::Internal("user without id".to_string()))?;
    let access_token = state.auth.issue_token(user_id)?;
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
        user: to_response(user),
    }))
}

pub(crate) fn to_response(user: User) -> UserResponse {
    UserResponse {
        id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
        username: user.username,
        email: user.email,
        created_at: user.created_at.try_to_rfc3339_string().unwrap_or_default(),
    }
}
