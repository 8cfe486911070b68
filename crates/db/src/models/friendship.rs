use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// A directed friend request. Once accepted the relation counts both ways.
///
/// At most one record exists per unordered user pair, whatever its status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Friendship {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub requester_id: ObjectId,
    pub recipient_id: ObjectId,
    pub status: FriendshipStatus,
    pub created_at: DateTime,
}

impl Friendship {
    pub const COLLECTION: &'static str = "friendships";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
    Rejected,
}
