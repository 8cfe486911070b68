use std::collections::HashMap;

use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use pmprep_db::models::User;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct UserDao {
    pub base: BaseDao<User>,
}

impl UserDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, User::COLLECTION),
        }
    }

    /// Inserts a new user. Username/email uniqueness is enforced by index and
    /// surfaces as [`DaoError::DuplicateKey`].
    pub async fn create(
        &self,
        username: String,
        email: String,
        password_hash: String,
    ) -> DaoResult<User> {
        let user = User {
            id: None,
            username,
            email,
            password_hash,
            created_at: DateTime::now(),
        };

        let id = self.base.insert_one(&user).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_by_email(&self, email: &str) -> DaoResult<User> {
        self.base
            .find_one(doc! { "email": email })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn find_by_username(&self, username: &str) -> DaoResult<User> {
        self.base
            .find_one(doc! { "username": username })
            .await?
            .ok_or(DaoError::NotFound)
    }

    /// Batch-fetch usernames for a list of user IDs.
    pub async fn find_usernames(
        &self,
        user_ids: &[ObjectId],
    ) -> DaoResult<HashMap<ObjectId, String>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let ids_bson: Vec<bson::Bson> =
            user_ids.iter().map(|id| bson::Bson::ObjectId(*id)).collect();
        let users = self
            .base
            .find_many(doc! { "_id": { "$in": ids_bson } }, None)
            .await?;

        Ok(users
            .into_iter()
            .filter_map(|u| u.id.map(|id| (id, u.username)))
            .collect())
    }
}
