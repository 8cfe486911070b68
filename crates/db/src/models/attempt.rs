use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// One recorded answer to a question.
///
/// `transcript`, `score` and `feedback` start out null and are filled in by
/// the enrichment pipeline. `score` and `feedback` are always written
/// together in a single update, so either both are present or neither is.
/// `transcript` may be present while the pair is still null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub question_id: ObjectId,
    /// Locator of the stored recording, set at creation and never changed.
    pub audio_path: String,
    pub transcript: Option<String>,
    pub score: Option<f64>,
    pub feedback: Option<Feedback>,
    pub created_at: DateTime,
}

impl Attempt {
    pub const COLLECTION: &'static str = "attempts";
}

/// Structured evaluation artifact produced by the scoring service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub scores: CriterionScores,
    pub overall_score: f64,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub summary: String,
}

/// Per-criterion scores, each in [1, 10].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScores {
    pub framework: f64,
    pub clarity: f64,
    pub depth: f64,
    pub user_focus: f64,
    pub business_acumen: f64,
}
