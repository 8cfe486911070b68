use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use pmprep_db::models::Question;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct QuestionDao {
    pub base: BaseDao<Question>,
}

impl QuestionDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Question::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        creator_id: ObjectId,
        title: String,
        description: String,
        category: Option<String>,
    ) -> DaoResult<Question> {
        let now = DateTime::now();
        let question = Question {
            id: None,
            creator_id,
            title,
            description,
            category,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&question).await?;
        self.base.find_by_id(id).await
    }

    pub async fn list(
        &self,
        category: Option<&str>,
        skip: u64,
        limit: i64,
    ) -> DaoResult<Vec<Question>> {
        let filter = match category {
            Some(category) => doc! { "category": category },
            None => doc! {},
        };
        self.base
            .find_page(filter, Some(doc! { "created_at": -1 }), skip, limit)
            .await
    }

    /// Updates title/description/category. Only the creator may update.
    pub async fn update(
        &self,
        question_id: ObjectId,
        actor_id: ObjectId,
        title: Option<String>,
        description: Option<String>,
        category: Option<String>,
    ) -> DaoResult<Question> {
        let question = self.base.find_by_id(question_id).await?;
        if question.creator_id != actor_id {
            return Err(DaoError::Forbidden(
                "only the creator may update this question".to_string(),
            ));
        }

        let mut set = doc! { "updated_at": DateTime::now() };
        if let Some(title) = title {
            set.insert("title", title);
        }
        if let Some(description) = description {
            set.insert("description", description);
        }
        if let Some(category) = category {
            set.insert("category", category);
        }

        self.base
            .update_by_id(question_id, doc! { "$set": set })
            .await?;
        self.base.find_by_id(question_id).await
    }

    /// Deletes a question. Only the creator may delete.
    pub async fn delete(&self, question_id: ObjectId, actor_id: ObjectId) -> DaoResult<()> {
        let question = self.base.find_by_id(question_id).await?;
        if question.creator_id != actor_id {
            return Err(DaoError::Forbidden(
                "only the creator may delete this question".to_string(),
            ));
        }

        self.base.delete_by_id(question_id).await?;
        Ok(())
    }
}
