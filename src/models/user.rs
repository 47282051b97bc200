use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// User aggregate: the base row plus the user's outgoing friendships
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Assigned by the store; ignored on add
    #[serde(default)]
    pub id: i64,
    pub login: String,
    #[serde(default)]
    pub name: String,
    pub email: String,
    pub birthday: NaiveDate,
    /// Targets of this user's outgoing friendship edges.
    ///
    /// Friendship is directed. `b` being in `a.friends` says nothing about
    /// `a` being in `b.friends`; each direction is its own stored edge.
    #[serde(default)]
    pub friends: BTreeSet<i64>,
}

impl User {
    /// The stored edges this user owns, one per entry in `friends`
    pub fn friendships(&self) -> impl Iterator<Item = Friendship> + '_ {
        self.friends.iter().map(move |&friend_id| Friendship {
            user_id: self.id,
            friend_id,
        })
    }
}

/// One directed edge of the friends relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::FromRow)]
pub struct Friendship {
    pub user_id: i64,
    pub friend_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_friendships_are_outgoing_edges() {
        let user = User {
            id: 5,
            login: "mia".to_string(),
            name: "Mia".to_string(),
            email: "mia@example.com".to_string(),
            birthday: NaiveDate::from_ymd_opt(1990, 1, 2).unwrap(),
            friends: [9, 3].into_iter().collect(),
        };

        let edges: Vec<Friendship> = user.friendships().collect();
        assert_eq!(
            edges,
            vec![
                Friendship {
                    user_id: 5,
                    friend_id: 3
                },
                Friendship {
                    user_id: 5,
                    friend_id: 9
                },
            ]
        );
    }
}
