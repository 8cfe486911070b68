use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bson::{oid::ObjectId, DateTime};
use thiserror::Error;
use tracing::{error, warn};

use pmprep_ai::{Evaluation, Evaluator, Transcriber};
use pmprep_db::models::{Attempt, CriterionScores, Feedback, Question};

use crate::dao::attempt::AttemptDao;
use crate::dao::base::{DaoError, DaoResult};
use crate::storage::AudioStore;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Store(#[from] DaoError),
    #[error("failed to store audio: {0}")]
    Audio(#[from] std::io::Error),
}

/// Narrow persistence boundary consumed by the pipeline. Implemented by
/// [`AttemptDao`] in production and by an in-memory fake in tests.
#[async_trait]
pub trait AttemptStore: Send + Sync {
    async fn insert(&self, attempt: &Attempt) -> DaoResult<ObjectId>;
    async fn get(&self, id: ObjectId) -> DaoResult<Attempt>;
    async fn set_transcript(&self, id: ObjectId, transcript: &str) -> DaoResult<bool>;
    async fn set_evaluation(
        &self,
        id: ObjectId,
        score: f64,
        feedback: &Feedback,
    ) -> DaoResult<bool>;
}

#[async_trait]
impl AttemptStore for AttemptDao {
    async fn insert(&self, attempt: &Attempt) -> DaoResult<ObjectId> {
        self.base.insert_one(attempt).await
    }

    async fn get(&self, id: ObjectId) -> DaoResult<Attempt> {
        self.base.find_by_id(id).await
    }

    async fn set_transcript(&self, id: ObjectId, transcript: &str) -> DaoResult<bool> {
        AttemptDao::set_transcript(self, id, transcript).await
    }

    async fn set_evaluation(
        &self,
        id: ObjectId,
        score: f64,
        feedback: &Feedback,
    ) -> DaoResult<bool> {
        AttemptDao::set_evaluation(self, id, score, feedback).await
    }
}

/// The attempt-evaluation pipeline.
///
/// Submission is decoupled from the two external AI calls: once the audio is
/// on disk and the attempt row is inserted, the submission has succeeded.
/// Transcription and evaluation are best-effort enrichment — their failures
/// are logged and absorbed, leaving the corresponding fields null. A later
/// re-processing pass can pick those attempts up again.
pub struct AttemptPipeline {
    store: Arc<dyn AttemptStore>,
    audio: AudioStore,
    transcriber: Arc<dyn Transcriber>,
    evaluator: Arc<dyn Evaluator>,
}

impl AttemptPipeline {
    pub fn new(
        store: Arc<dyn AttemptStore>,
        audio: AudioStore,
        transcriber: Arc<dyn Transcriber>,
        evaluator: Arc<dyn Evaluator>,
    ) -> Self {
        Self {
            store,
            audio,
            transcriber,
            evaluator,
        }
    }

    /// Stores the recording, persists the attempt, then runs enrichment.
    ///
    /// The caller resolves `question` beforehand, so a submission against a
    /// missing question fails before anything is written.
    pub async fn submit(
        &self,
        user_id: ObjectId,
        question: &Question,
        audio: &[u8],
        extension: &str,
    ) -> Result<Attempt, SubmitError> {
        let question_id = question.id.ok_or(DaoError::NotFound)?;

        let audio_path = self.audio.save(audio, extension).await?;
        let attempt = Attempt {
            id: None,
            user_id,
            question_id,
            audio_path,
            transcript: None,
            score: None,
            feedback: None,
            created_at: DateTime::now(),
        };
        let id = self.store.insert(&attempt).await?;

        // The attempt is durable from here on: nothing in enrichment may
        // fail the submission or roll it back.
        self.enrich(id, question, audio, &attempt.audio_path).await;

        Ok(self.store.get(id).await?)
    }

    async fn enrich(&self, id: ObjectId, question: &Question, audio: &[u8], audio_path: &str) {
        let file_name = Path::new(audio_path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.webm".to_string());

        let transcript = match self.transcriber.transcribe(audio, &file_name).await {
            Ok(text) => text,
            Err(err) => {
                warn!(attempt_id = %id, backend = self.transcriber.name(), %err,
                    "transcription failed; leaving transcript unset");
                return;
            }
        };
        if let Err(err) = self.store.set_transcript(id, &transcript).await {
            error!(attempt_id = %id, %err, "failed to persist transcript");
            return;
        }

        // Evaluation needs a transcript; with none it is skipped entirely.
        let evaluation = match self
            .evaluator
            .evaluate(&question.title, &question.description, &transcript)
            .await
        {
            Ok(evaluation) => evaluation,
            Err(err) => {
                warn!(attempt_id = %id, backend = self.evaluator.name(), %err,
                    "evaluation failed; leaving score and feedback unset");
                return;
            }
        };

        let score = round2(evaluation.overall_score);
        let feedback = to_feedback(evaluation);
        if let Err(err) = self.store.set_evaluation(id, score, &feedback).await {
            error!(attempt_id = %id, %err, "failed to persist evaluation");
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn to_feedback(evaluation: Evaluation) -> Feedback {
    Feedback {
        scores: CriterionScores {
            framework: evaluation.scores.framework,
            clarity: evaluation.scores.clarity,
            depth: evaluation.scores.depth,
            user_focus: evaluation.scores.user_focus,
            business_acumen: evaluation.scores.business_acumen,
        },
        overall_score: evaluation.overall_score,
        strengths: evaluation.strengths,
        improvements: evaluation.improvements,
        summary: evaluation.summary,
    }
}
