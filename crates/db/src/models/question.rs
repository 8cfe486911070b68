use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// An interview prompt. Title, description and category are mutable, but
/// only by the creator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub creator_id: ObjectId,
    pub title: String,
    pub description: String,
    /// e.g. "Product Design", "Strategy", "Metrics".
    pub category: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Question {
    pub const COLLECTION: &'static str = "questions";
}
