use bson::{doc, oid::ObjectId};
use mongodb::Database;
use pmprep_db::models::{Attempt, Feedback};

use super::base::{BaseDao, DaoResult};

pub struct AttemptDao {
    pub base: BaseDao<Attempt>,
}

impl AttemptDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Attempt::COLLECTION),
        }
    }

    pub async fn find_by_user(&self, user_id: ObjectId) -> DaoResult<Vec<Attempt>> {
        self.base
            .find_many(
                doc! { "user_id": user_id },
                Some(doc! { "created_at": -1 }),
            )
            .await
    }

    pub async fn set_transcript(&self, id: ObjectId, transcript: &str) -> DaoResult<bool> {
        self.base
            .update_by_id(id, doc! { "$set": { "transcript": transcript } })
            .await
    }

    /// Writes score and feedback in a single update so the pair is never
    /// half-set.
    pub async fn set_evaluation(
        &self,
        id: ObjectId,
        score: f64,
        feedback: &Feedback,
    ) -> DaoResult<bool> {
        self.base
            .update_by_id(
                id,
                doc! { "$set": { "score": score, "feedback": bson::to_bson(feedback)? } },
            )
            .await
    }

    /// All `(user_id, score)` pairs from scored attempts, for the
    /// leaderboard aggregator.
    pub async fn list_scored(&self) -> DaoResult<Vec<(ObjectId, f64)>> {
        let attempts = self
            .base
            .find_many(
                doc! { "score": { "$ne": null } },
                Some(doc! { "created_at": 1 }),
            )
            .await?;

        Ok(attempts
            .into_iter()
            .filter_map(|a| a.score.map(|s| (a.user_id, s)))
            .collect())
    }
}
