use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use serde::Serialize;

use pmprep_db::models::{Attempt, Feedback};

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Serialize)]
pub struct AttemptResponse {
    pub id: String,
    pub user_id: String,
    pub question_id: String,
    pub audio_path: String,
    pub transcript: Option<String>,
    pub score: Option<f64>,
    pub feedback: Option<Feedback>,
    pub created_at: String,
}

/// Submit an attempt: multipart form with a `question_id` field and an
/// `audio` file. The response carries whatever enrichment finished;
/// transcript/score/feedback may legitimately be null.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<AttemptResponse>), ApiError> {
    let mut question_id: Option<ObjectId> = None;
    let mut audio: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let name = field.name().map(|n| n.to_string());
        match name.as_deref() {
            Some("question_id") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                question_id = Some(
                    ObjectId::parse_str(raw.trim())
                        .map_err(|_| ApiError::BadRequest("Invalid question_id".to_string()))?,
                );
            }
            Some("audio") => {
                let extension = field
                    .file_name()
                    .and_then(|name| name.rsplit_once('.').map(|(_, ext)| ext.to_string()))
                    .unwrap_or_else(|| "webm".to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                audio = Some((bytes.to_vec(), extension));
            }
            _ => {}
        }
    }

    let question_id =
        question_id.ok_or_else(|| ApiError::BadRequest("Missing question_id".to_string()))?;
    // An empty recording is still a submission: the transcriber rejects it
    // and the attempt persists with a null transcript.
    let (audio_bytes, extension) =
        audio.ok_or_else(|| ApiError::BadRequest("Missing audio file".to_string()))?;

    // NotFound before anything is written.
    let question = state.questions.base.find_by_id(question_id).await?;

    let attempt = state
        .pipeline
        .submit(auth.user_id, &question, &audio_bytes, &extension)
        .await?;

    Ok((StatusCode::CREATED, Json(to_response(attempt))))
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<AttemptResponse>>, ApiError> {
    let attempts = state.attempts.find_by_user(auth.user_id).await?;
    Ok(Json(attempts.into_iter().map(to_response).collect()))
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(attempt_id): Path<String>,
) -> Result<Json<AttemptResponse>, ApiError> {
    let id = ObjectId::parse_str(&attempt_id)
        .map_err(|_| ApiError::BadRequest("Invalid attempt_id".to_string()))?;

    let attempt = state.attempts.base.find_by_id(id).await?;
    if attempt.user_id != auth.user_id {
        return Err(ApiError::Forbidden(
            "Not authorized to view this attempt".to_string(),
        ));
    }

    Ok(Json(to_response(attempt)))
}

fn to_response(attempt: Attempt) -> AttemptResponse {
    AttemptResponse {
        id: attempt.id.map(|id| id.to_hex()).unwrap_or_default(),
        user_id: attempt.user_id.to_hex(),
        question_id: attempt.question_id.to_hex(),
        audio_path: attempt.audio_path,
        transcript: attempt.transcript,
        score: attempt.score,
        feedback: attempt.feedback,
        created_at: attempt
            .created_at
            .try_to_rfc3339_string()
            .unwrap_or_default(),
    }
}
