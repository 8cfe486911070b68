use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use pmprep_db::models::Question;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    pub title: String,
    pub description: String,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuestionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub category: Option<String>,
}

fn default_limit() -> i64 {
    100
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub id: String,
    pub creator_id: String,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub created_at: String,
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateQuestionRequest>,
) -> Result<(StatusCode, Json<QuestionResponse>), ApiError> {
    let question = state
        .questions
        .create(auth.user_id, body.title, body.description, body.category)
        .await?;
    Ok((StatusCode::CREATED, Json(to_response(question))))
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<QuestionResponse>>, ApiError> {
    let questions = state
        .questions
        .list(params.category.as_deref(), params.skip, params.limit)
        .await?;
    Ok(Json(questions.into_iter().map(to_response).collect()))
}

pub async fn get(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
) -> Result<Json<QuestionResponse>, ApiError> {
    let id = parse_id(&question_id)?;
    let question = state.questions.base.find_by_id(id).await?;
    Ok(Json(to_response(question)))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(question_id): Path<String>,
    Json(body): Json<UpdateQuestionRequest>,
) -> Result<Json<QuestionResponse>, ApiError> {
    let id = parse_id(&question_id)?;
    let question = state
        .questions
        .update(id, auth.user_id, body.title, body.description, body.category)
        .await?;
    Ok(Json(to_response(question)))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(question_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&question_id)?;
    state.questions.delete(id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid question_id".to_string()))
}

fn to_response(question: Question) -> QuestionResponse {
    QuestionResponse {
        id: question.id.map(|id| id.to_hex()).unwrap_or_default(),
        creator_id: question.creator_id.to_hex(),
        title: question.title,
        description: question.description,
        category: question.category,
        created_at: question
            .created_at
            .try_to_rfc3339_string()
            .unwrap_or_default(),
    }
}
