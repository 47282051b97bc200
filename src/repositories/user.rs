use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqliteConnection;
use tracing::instrument;

use super::{join_table::FRIENDS, UserRepository};
use crate::{
    db::Store,
    error::{AppError, AppResult, Entity},
    models::{Friendship, User},
};

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    user_id: i64,
    login: String,
    name: String,
    email: String,
    birthday: NaiveDate,
}

impl UserRow {
    fn into_user(self, friends: BTreeSet<i64>) -> User {
        User {
            id: self.user_id,
            login: self.login,
            name: self.name,
            email: self.email,
            birthday: self.birthday,
            friends,
        }
    }
}

/// Outgoing edges grouped by their source user
fn group_by_source(edges: Vec<Friendship>) -> HashMap<i64, BTreeSet<i64>> {
    let mut grouped: HashMap<i64, BTreeSet<i64>> = HashMap::new();
    for edge in edges {
        grouped.entry(edge.user_id).or_default().insert(edge.friend_id);
    }
    grouped
}

async fn fetch_friend_ids(conn: &mut SqliteConnection, user_id: i64) -> AppResult<BTreeSet<i64>> {
    let ids: Vec<i64> =
        sqlx::query_scalar("SELECT friend_id FROM friends WHERE user_id = ? ORDER BY friend_id")
            .bind(user_id)
            .fetch_all(&mut *conn)
            .await?;
    Ok(ids.into_iter().collect())
}

async fn fetch_user(conn: &mut SqliteConnection, id: i64) -> AppResult<User> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT user_id, login, name, email, birthday FROM users WHERE user_id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(AppError::NotFound(Entity::User(id)))?;

    let friends = fetch_friend_ids(conn, id).await?;
    Ok(row.into_user(friends))
}

async fn user_exists(conn: &mut SqliteConnection, id: i64) -> AppResult<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT user_id FROM users WHERE user_id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found.is_some())
}

pub struct SqlUserRepository {
    store: Store,
}

impl SqlUserRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for SqlUserRepository {
    #[instrument(skip(self, user), fields(login = %user.login))]
    async fn add(&self, user: &User) -> AppResult<User> {
        let mut tx = self.store.begin().await?;

        let user_id =
            sqlx::query("INSERT INTO users (login, name, email, birthday) VALUES (?, ?, ?, ?)")
                .bind(&user.login)
                .bind(&user.name)
                .bind(&user.email)
                .bind(user.birthday)
                .execute(&mut *tx)
                .await?
                .last_insert_rowid();

        let stored = fetch_user(&mut *tx, user_id).await?;
        tx.commit().await?;

        tracing::info!(user_id, "User added");
        Ok(stored)
    }

    #[instrument(skip(self, user), fields(user_id = user.id))]
    async fn update(&self, user: &User) -> AppResult<User> {
        let mut tx = self.store.begin().await?;

        if !user_exists(&mut *tx, user.id).await? {
            return Err(AppError::NotFound(Entity::User(user.id)));
        }
        for &friend_id in &user.friends {
            if !user_exists(&mut *tx, friend_id).await? {
                return Err(AppError::NotFound(Entity::User(friend_id)));
            }
        }

        sqlx::query("UPDATE users SET login = ?, name = ?, email = ?, birthday = ? WHERE user_id = ?")
            .bind(&user.login)
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.birthday)
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        FRIENDS
            .replace(&mut *tx, user.id, user.friendships().map(|edge| edge.friend_id))
            .await?;

        let stored = fetch_user(&mut *tx, user.id).await?;
        tx.commit().await?;

        tracing::info!(user_id = user.id, friends = stored.friends.len(), "User updated");
        Ok(stored)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i64) -> AppResult<User> {
        let mut conn = self.store.acquire().await?;
        fetch_user(&mut *conn, id).await
    }

    #[instrument(skip(self))]
    async fn get_all(&self) -> AppResult<Vec<User>> {
        let mut conn = self.store.acquire().await?;

        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT user_id, login, name, email, birthday FROM users ORDER BY user_id",
        )
        .fetch_all(&mut *conn)
        .await?;

        // One query for every edge instead of one per user
        let edges = sqlx::query_as::<_, Friendship>(
            "SELECT user_id, friend_id FROM friends ORDER BY user_id, friend_id",
        )
        .fetch_all(&mut *conn)
        .await?;
        let mut friends = group_by_source(edges);

        let users: Vec<User> = rows
            .into_iter()
            .map(|row| {
                let outgoing = friends.remove(&row.user_id).unwrap_or_default();
                row.into_user(outgoing)
            })
            .collect();

        tracing::debug!(count = users.len(), "Loaded users");
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(user_id: i64, friend_id: i64) -> Friendship {
        Friendship { user_id, friend_id }
    }

    #[test]
    fn test_group_by_source_keeps_direction() {
        let grouped = group_by_source(vec![edge(1, 2), edge(1, 3), edge(3, 1)]);

        assert_eq!(grouped[&1].iter().copied().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(grouped[&3].iter().copied().collect::<Vec<_>>(), vec![1]);
        assert!(!grouped.contains_key(&2));
    }

    #[test]
    fn test_group_by_source_empty() {
        assert!(group_by_source(Vec::new()).is_empty());
    }
}
