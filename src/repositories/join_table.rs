use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::error::AppResult;

/// A two-column association table keyed by `(owner, target)`
pub(crate) struct JoinTable {
    table: &'static str,
    owner: &'static str,
    target: &'static str,
}

pub(crate) const FILM_GENRE: JoinTable = JoinTable {
    table: "film_genre",
    owner: "film_id",
    target: "genre_id",
};

pub(crate) const LIKES: JoinTable = JoinTable {
    table: "likes",
    owner: "film_id",
    target: "user_id",
};

pub(crate) const FRIENDS: JoinTable = JoinTable {
    table: "friends",
    owner: "user_id",
    target: "friend_id",
};

impl JoinTable {
    /// Replace every row owned by `owner_id` with one row per target.
    ///
    /// Whole-collection semantics: rows absent from `targets` are removed.
    pub(crate) async fn replace<I>(
        &self,
        conn: &mut SqliteConnection,
        owner_id: i64,
        targets: I,
    ) -> AppResult<()>
    where
        I: IntoIterator<Item = i64>,
    {
        let delete = format!("DELETE FROM {} WHERE {} = ?", self.table, self.owner);
        sqlx::query(&delete)
            .bind(owner_id)
            .execute(&mut *conn)
            .await?;

        let mut targets = targets.into_iter().peekable();
        if targets.peek().is_none() {
            return Ok(());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "INSERT INTO {} ({}, {}) ",
            self.table, self.owner, self.target
        ));
        builder.push_values(targets, |mut row, target| {
            row.push_bind(owner_id).push_bind(target);
        });
        builder.build().execute(&mut *conn).await?;

        Ok(())
    }
}
