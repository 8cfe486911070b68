use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use pmprep_db::models::{Friendship, FriendshipStatus};

use super::base::{BaseDao, DaoError, DaoResult};

pub struct FriendshipDao {
    pub base: BaseDao<Friendship>,
}

impl FriendshipDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Friendship::COLLECTION),
        }
    }

    /// Creates a pending request. At most one record may exist per unordered
    /// user pair: any existing record in either direction, whatever its
    /// status, makes a new request a conflict.
    pub async fn request(
        &self,
        requester_id: ObjectId,
        recipient_id: ObjectId,
    ) -> DaoResult<Friendship> {
        if requester_id == recipient_id {
            return Err(DaoError::Validation(
                "cannot send a friend request to yourself".to_string(),
            ));
        }

        let existing = self
            .base
            .find_one(pair_filter(requester_id, recipient_id))
            .await?;
        if existing.is_some() {
            return Err(DaoError::DuplicateKey(
                "a friend request already exists between these users".to_string(),
            ));
        }

        let friendship = Friendship {
            id: None,
            requester_id,
            recipient_id,
            status: FriendshipStatus::Pending,
            created_at: DateTime::now(),
        };

        let id = self.base.insert_one(&friendship).await?;
        self.base.find_by_id(id).await
    }

    /// Accepts or rejects a pending request. Only the recipient may respond,
    /// and only while the request is still pending.
    pub async fn respond(
        &self,
        friendship_id: ObjectId,
        actor_id: ObjectId,
        status: FriendshipStatus,
    ) -> DaoResult<Friendship> {
        let friendship = self.base.find_by_id(friendship_id).await?;
        if friendship.recipient_id != actor_id {
            return Err(DaoError::Forbidden(
                "only the recipient may respond to this request".to_string(),
            ));
        }
        if friendship.status != FriendshipStatus::Pending {
            return Err(DaoError::Validation(
                "friend request is not pending".to_string(),
            ));
        }

        self.base
            .update_by_id(
                friendship_id,
                doc! { "$set": { "status": bson::to_bson(&status)? } },
            )
            .await?;
        self.base.find_by_id(friendship_id).await
    }

    /// IDs of every user in an accepted friendship with `user_id`, in either
    /// direction.
    pub async fn accepted_friend_ids(&self, user_id: ObjectId) -> DaoResult<Vec<ObjectId>> {
        let accepted = bson::to_bson(&FriendshipStatus::Accepted)?;
        let friendships = self
            .base
            .find_many(
                doc! {
                    "status": accepted,
                    "$or": [
                        { "requester_id": user_id },
                        { "recipient_id": user_id },
                    ],
                },
                None,
            )
            .await?;

        Ok(friendships
            .into_iter()
            .map(|f| {
                if f.requester_id == user_id {
                    f.recipient_id
                } else {
                    f.requester_id
                }
            })
            .collect())
    }

    /// Pending requests addressed to `user_id`.
    pub async fn pending_for(&self, user_id: ObjectId) -> DaoResult<Vec<Friendship>> {
        let pending = bson::to_bson(&FriendshipStatus::Pending)?;
        self.base
            .find_many(
                doc! { "recipient_id": user_id, "status": pending },
                Some(doc! { "created_at": -1 }),
            )
            .await
    }
}

fn pair_filter(a: ObjectId, b: ObjectId) -> bson::Document {
    doc! {
        "$or": [
            { "requester_id": a, "recipient_id": b },
            { "requester_id": b, "recipient_id": a },
        ]
    }
}
