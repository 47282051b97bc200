use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::instrument;

use crate::{error::AppResult, models::User, repositories::UserRepository};

/// Friendship edits and queries over the directed friends relation.
///
/// Every operation here touches only the edge owned by `user_id`. Adding
/// `friend_id` to `user_id` never adds the reverse edge.
pub struct FriendService {
    users: Arc<dyn UserRepository>,
}

impl FriendService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    #[instrument(skip(self))]
    pub async fn add_friend(&self, user_id: i64, friend_id: i64) -> AppResult<User> {
        let mut user = self.users.get_by_id(user_id).await?;
        let friend = self.users.get_by_id(friend_id).await?;

        user.friends.insert(friend.id);
        self.users.update(&user).await
    }

    /// Drops the edge if present; removing an absent edge is not an error
    #[instrument(skip(self))]
    pub async fn remove_friend(&self, user_id: i64, friend_id: i64) -> AppResult<User> {
        let mut user = self.users.get_by_id(user_id).await?;
        let friend = self.users.get_by_id(friend_id).await?;

        user.friends.remove(&friend.id);
        self.users.update(&user).await
    }

    /// Users this user has befriended, in id order
    #[instrument(skip(self))]
    pub async fn friends(&self, user_id: i64) -> AppResult<Vec<User>> {
        let user = self.users.get_by_id(user_id).await?;
        self.users_in(&user.friends).await
    }

    /// Users both `user_id` and `other_id` have befriended, in id order
    #[instrument(skip(self))]
    pub async fn common_friends(&self, user_id: i64, other_id: i64) -> AppResult<Vec<User>> {
        let user = self.users.get_by_id(user_id).await?;
        let other = self.users.get_by_id(other_id).await?;

        let shared: BTreeSet<i64> = user.friends.intersection(&other.friends).copied().collect();
        self.users_in(&shared).await
    }

    async fn users_in(&self, ids: &BTreeSet<i64>) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = self.users.get_all().await?;
        Ok(users.into_iter().filter(|u| ids.contains(&u.id)).collect())
    }
}
