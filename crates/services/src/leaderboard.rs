use std::collections::HashMap;
use std::sync::Arc;

use bson::oid::ObjectId;
use serde::Serialize;

use crate::dao::attempt::AttemptDao;
use crate::dao::base::DaoResult;
use crate::dao::friendship::FriendshipDao;
use crate::dao::user::UserDao;

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub user_id: ObjectId,
    pub username: String,
    pub average_score: f64,
    pub total_attempts: u64,
}

/// Ranks users by average score over their scored attempts.
///
/// Users with no scored attempts never appear. The friend variant scopes the
/// board to the caller plus everyone in an accepted friendship with them.
pub struct LeaderboardService {
    attempts: Arc<AttemptDao>,
    users: Arc<UserDao>,
    friendships: Arc<FriendshipDao>,
}

impl LeaderboardService {
    pub fn new(
        attempts: Arc<AttemptDao>,
        users: Arc<UserDao>,
        friendships: Arc<FriendshipDao>,
    ) -> Self {
        Self {
            attempts,
            users,
            friendships,
        }
    }

    pub async fn global(&self, limit: usize) -> DaoResult<Vec<LeaderboardEntry>> {
        let rows = self.attempts.list_scored().await?;
        let mut ranked = rank_scores(&rows);
        ranked.truncate(limit);
        self.resolve_usernames(ranked).await
    }

    pub async fn friends(&self, user_id: ObjectId) -> DaoResult<Vec<LeaderboardEntry>> {
        let mut eligible = self.friendships.accepted_friend_ids(user_id).await?;
        eligible.push(user_id);

        let rows: Vec<(ObjectId, f64)> = self
            .attempts
            .list_scored()
            .await?
            .into_iter()
            .filter(|(uid, _)| eligible.contains(uid))
            .collect();

        self.resolve_usernames(rank_scores(&rows)).await
    }

    async fn resolve_usernames(
        &self,
        ranked: Vec<(ObjectId, f64, u64)>,
    ) -> DaoResult<Vec<LeaderboardEntry>> {
        let ids: Vec<ObjectId> = ranked.iter().map(|(id, _, _)| *id).collect();
        let usernames = self.users.find_usernames(&ids).await?;

        Ok(ranked
            .into_iter()
            .filter_map(|(user_id, average_score, total_attempts)| {
                usernames.get(&user_id).map(|username| LeaderboardEntry {
                    user_id,
                    username: username.clone(),
                    average_score,
                    total_attempts,
                })
            })
            .collect())
    }
}

/// Groups `(user_id, score)` pairs by user and ranks by mean score,
/// descending. Sorting happens on the raw mean; the returned mean is rounded
/// to 2 decimals afterwards, so users whose averages differ only past the
/// second decimal still order correctly. The sort is stable, so true ties
/// keep first-appearance order of the input.
pub fn rank_scores(rows: &[(ObjectId, f64)]) -> Vec<(ObjectId, f64, u64)> {
    let mut order: Vec<ObjectId> = Vec::new();
    let mut sums: HashMap<ObjectId, (f64, u64)> = HashMap::new();

    for &(user_id, score) in rows {
        let entry = sums.entry(user_id).or_insert_with(|| {
            order.push(user_id);
            (0.0, 0)
        });
        entry.0 += score;
        entry.1 += 1;
    }

    let mut ranked: Vec<(ObjectId, f64, u64)> = order
        .into_iter()
        .map(|user_id| {
            let (sum, count) = sums[&user_id];
            (user_id, sum / count as f64, count)
        })
        .collect();

    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    for row in &mut ranked {
        row.1 = (row.1 * 100.0).round() / 100.0;
    }
    ranked
}
